//! Insertion sessions.
//!
//! A session is one end-to-end insertion attempt started by a single user action. It owns its
//! mutable state ([`SessionState`]) for the whole asynchronous chain:
//!
//! ```text
//! open buffer -> parse -> locate construct -> find definition -> slice + resolve signature
//!             -> choose name (optional prompt) -> plan -> apply edits
//! ```
//!
//! Every step that fails to produce a usable result aborts the session before any edit is made.

use crate::construct::{ComponentConstruct, ConstructKind, TextSpan};
use crate::host::{BufferId, Host, HostError};
use crate::indent::IndentSettings;
use crate::line_index::LineIndex;
use crate::locate::{ConstructPredicate, SearchDirection, SyntaxTree, locate};
use crate::signature::{HandlerParam, declaration_slice, resolve};
use crate::synth::{BindingSite, HandlerSynthesizer, InsertionPlan};
use futures::future::join_all;
use handler_core_lang::{FrameworkConfig, HandlerStyle, is_identifier};
use serde::Deserialize;
use tracing::{debug, warn};

/// How the handler name and binding are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertionMode {
    /// Derived handler name; the binding expression is inserted at the trigger.
    #[default]
    Direct,
    /// The user is prompted for the handler name; the binding expression is inserted at the
    /// trigger.
    Interactive,
    /// An upstream completion item already wrote the binding; only the stub is inserted.
    Completion,
}

/// The user action that started a session.
///
/// The event name is expected to end right where the trigger span starts
/// (`onChange` immediately followed by the trigger character).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorTrigger {
    buffer: BufferId,
    span: TextSpan,
    event_name: String,
    mode: InsertionMode,
    bind_object: Option<String>,
}

impl CursorTrigger {
    /// Create a trigger for `event_name` in `buffer`, where `span` is the trigger character span.
    pub fn new(
        buffer: BufferId,
        span: TextSpan,
        event_name: impl Into<String>,
        mode: InsertionMode,
    ) -> Self {
        Self {
            buffer,
            span,
            event_name: event_name.into(),
            mode,
            bind_object: None,
        }
    }

    /// Force the binding receiver instead of deriving it from the construct kind.
    pub fn with_bind_object(mut self, bind_object: impl Into<String>) -> Self {
        self.bind_object = Some(bind_object.into());
        self
    }

    /// Buffer the trigger fired in.
    pub fn buffer(&self) -> &BufferId {
        &self.buffer
    }

    /// Trigger character span.
    pub fn span(&self) -> TextSpan {
        self.span
    }

    /// Event prop name (e.g. `onChange`).
    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    /// Insertion mode.
    pub fn mode(&self) -> InsertionMode {
        self.mode
    }

    /// Binding receiver override, if any.
    pub fn bind_object(&self) -> Option<&str> {
        self.bind_object.as_deref()
    }

    /// Offset of the event prop name, used for the definition lookup.
    pub fn attribute_offset(&self) -> usize {
        self.span
            .start
            .saturating_sub(self.event_name.chars().count())
    }
}

/// What to do when no definition text resolves to a parameter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedSignature {
    /// Abort the session without editing.
    #[default]
    Abort,
    /// Insert a stub without parameters.
    EmptyParameters,
}

/// Session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Framework description (base components, handler prefix, receiver).
    pub framework: FrameworkConfig,
    /// Stub shape.
    pub style: HandlerStyle,
    /// Buffer indentation settings.
    pub indent: IndentSettings,
    /// Construct search order.
    pub direction: SearchDirection,
    /// Policy for unresolvable signatures.
    pub unresolved_signature: UnresolvedSignature,
    /// How many superclass hops a predicate may follow across buffers.
    pub max_superclass_depth: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            framework: FrameworkConfig::default(),
            style: HandlerStyle::default(),
            indent: IndentSettings::default(),
            direction: SearchDirection::Outward,
            unresolved_signature: UnresolvedSignature::Abort,
            max_superclass_depth: 4,
        }
    }
}

impl SessionConfig {
    /// Set the framework description.
    pub fn with_framework(mut self, framework: FrameworkConfig) -> Self {
        self.framework = framework;
        self
    }

    /// Set the stub style.
    pub fn with_style(mut self, style: HandlerStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the buffer indentation settings.
    pub fn with_indent(mut self, indent: IndentSettings) -> Self {
        self.indent = indent;
        self
    }

    /// Set the construct search order.
    pub fn with_direction(mut self, direction: SearchDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Set the policy for unresolvable signatures.
    pub fn with_unresolved_signature(mut self, policy: UnresolvedSignature) -> Self {
        self.unresolved_signature = policy;
        self
    }

    /// Set how many superclass hops a predicate may follow across buffers.
    pub fn with_max_superclass_depth(mut self, depth: usize) -> Self {
        self.max_superclass_depth = depth;
        self
    }
}

/// Parsing and component recognition for one source language.
///
/// `H` is the host type, so predicates can resolve superclasses through it.
pub trait ComponentSyntax<H: Host + ?Sized> {
    /// Parsed tree type.
    type Tree: SyntaxTree;

    /// Predicate recognizing component constructs in [`Self::Tree`].
    type Predicate<'a>: ConstructPredicate<Self::Tree>
    where
        Self: 'a,
        H: 'a;

    /// Parse `text`. Returns `None` if the text cannot be parsed at all.
    fn parse(&self, text: &str) -> Option<Self::Tree>;

    /// Build the predicate for a session on `buffer`.
    fn predicate<'a>(
        &'a self,
        host: &'a H,
        buffer: &'a BufferId,
        config: &'a SessionConfig,
    ) -> Self::Predicate<'a>;
}

/// Why a session made no edit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AbortReason {
    /// The buffer could not be parsed.
    #[error("buffer could not be parsed")]
    Parse,
    /// No component construct encloses the trigger.
    #[error("no enclosing component")]
    NoConstruct,
    /// The event prop has no definition.
    #[error("no definition for the event prop")]
    NoDefinition,
    /// No definition resolved to a callback signature.
    #[error("callback signature could not be resolved")]
    UnresolvedSignature,
    /// A host service failed.
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Summary of a successful session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionReport {
    /// Name of the inserted handler.
    pub handler_name: String,
    /// Form of the targeted construct.
    pub kind: ConstructKind,
    /// The applied plan.
    pub plan: InsertionPlan,
}

/// Result of [`run_insertion_session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The stub (and binding, unless in completion mode) was applied.
    Inserted(InsertionReport),
    /// Nothing was inserted.
    Aborted(AbortReason),
}

impl SessionOutcome {
    /// Returns `true` if the session inserted a handler.
    pub fn is_inserted(&self) -> bool {
        matches!(self, Self::Inserted(_))
    }
}

/// Mutable per-session state, owned by the session for its whole lifetime.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// The trigger that started the session.
    pub trigger: CursorTrigger,
    /// The handler name; starts as the derived default and may be replaced by the prompt.
    pub handler_name: String,
}

/// One insertion attempt.
pub struct InsertionSession<'a, H: Host + ?Sized, S: ComponentSyntax<H>> {
    host: &'a H,
    syntax: &'a S,
    config: &'a SessionConfig,
    state: SessionState,
}

impl<'a, H, S> InsertionSession<'a, H, S>
where
    H: Host + ?Sized,
    S: ComponentSyntax<H>,
{
    /// Prepare a session for `trigger`.
    pub fn new(host: &'a H, syntax: &'a S, config: &'a SessionConfig, trigger: CursorTrigger) -> Self {
        let handler_name = config.framework.handler_name(trigger.event_name());
        Self {
            host,
            syntax,
            config,
            state: SessionState {
                trigger,
                handler_name,
            },
        }
    }

    /// Current session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Run the session to completion.
    pub async fn run(mut self) -> SessionOutcome {
        let buffer = self.state.trigger.buffer().clone();
        match self.try_run().await {
            Ok(report) => {
                debug!(
                    buffer = %buffer,
                    handler = %report.handler_name,
                    kind = ?report.kind,
                    "inserted handler stub"
                );
                SessionOutcome::Inserted(report)
            }
            Err(reason) => {
                match &reason {
                    AbortReason::Host(err) => {
                        warn!(buffer = %buffer, error = %err, "handler insertion aborted")
                    }
                    other => debug!(buffer = %buffer, reason = %other, "nothing to insert"),
                }
                SessionOutcome::Aborted(reason)
            }
        }
    }

    async fn try_run(&mut self) -> Result<InsertionReport, AbortReason> {
        let buffer = self.state.trigger.buffer().clone();
        let source = self.host.open_buffer(&buffer).await?;
        let index = LineIndex::from_text(&source);
        let parsed = blank_span(&source, self.state.trigger.span());
        let tree = self.syntax.parse(&parsed).ok_or(AbortReason::Parse)?;

        let construct = {
            let mut predicate = self.syntax.predicate(self.host, &buffer, self.config);
            locate(
                &tree,
                self.state.trigger.span().start,
                &mut predicate,
                self.config.direction,
            )
            .await
        }
        .ok_or(AbortReason::NoConstruct)?;

        let params = self.resolve_parameters(&buffer).await?;
        self.choose_handler_name().await?;

        let plan = self.plan(&index, &construct, &params);
        self.apply(&buffer, &plan)?;

        Ok(InsertionReport {
            handler_name: self.state.handler_name.clone(),
            kind: construct.kind(),
            plan,
        })
    }

    async fn resolve_parameters(&self, buffer: &BufferId) -> Result<Vec<HandlerParam>, AbortReason> {
        let offset = self.state.trigger.attribute_offset();
        let targets = self.host.find_definition(buffer, offset).await?;
        if targets.is_empty() {
            return Err(AbortReason::NoDefinition);
        }

        let texts = join_all(targets.iter().map(|target| self.host.open_buffer(&target.buffer))).await;

        let mut last_error = None;
        let mut opened_any = false;
        for (target, text) in targets.iter().zip(texts) {
            let text = match text {
                Ok(text) => text,
                Err(err) => {
                    debug!(buffer = %target.buffer, error = %err, "definition buffer unavailable");
                    last_error = Some(err);
                    continue;
                }
            };
            opened_any = true;

            let resolved = declaration_slice(&text, target.span.start)
                .as_deref()
                .and_then(resolve);
            if let Some(params) = resolved {
                return Ok(params);
            }
        }

        if !opened_any && let Some(err) = last_error {
            return Err(err.into());
        }

        match self.config.unresolved_signature {
            UnresolvedSignature::Abort => Err(AbortReason::UnresolvedSignature),
            UnresolvedSignature::EmptyParameters => Ok(Vec::new()),
        }
    }

    async fn choose_handler_name(&mut self) -> Result<(), AbortReason> {
        if self.state.trigger.mode() != InsertionMode::Interactive {
            return Ok(());
        }

        let default_name = self.state.handler_name.clone();
        let answer = self.host.prompt_user(&default_name).await?;
        match answer.as_deref().map(str::trim) {
            Some(name) if is_identifier(name) => self.state.handler_name = name.to_string(),
            Some("") | None => {}
            Some(name) => {
                debug!(answer = name, fallback = %default_name, "prompted handler name is not an identifier")
            }
        }
        Ok(())
    }

    fn plan(
        &self,
        index: &LineIndex,
        construct: &ComponentConstruct,
        params: &[HandlerParam],
    ) -> InsertionPlan {
        let synth = HandlerSynthesizer::new(&self.config.style, &self.config.indent);
        let width = synth.indent_width(index, construct);

        let trigger = &self.state.trigger;
        let binding = match trigger.mode() {
            InsertionMode::Completion => None,
            InsertionMode::Direct | InsertionMode::Interactive => {
                let bind_object = match (trigger.bind_object(), construct.kind()) {
                    (Some(explicit), _) => explicit.to_string(),
                    (None, ConstructKind::Class) => self.config.framework.class_bind_object.clone(),
                    (None, ConstructKind::Function) => String::new(),
                };
                Some(BindingSite {
                    span: trigger.span(),
                    bind_object,
                })
            }
        };

        synth.plan(
            index,
            construct,
            params,
            width,
            &self.state.handler_name,
            binding,
        )
    }

    fn apply(&self, buffer: &BufferId, plan: &InsertionPlan) -> Result<(), AbortReason> {
        for (applied, edit) in plan.edits().into_iter().enumerate() {
            if let Err(err) = self.host.apply_edit(buffer, edit) {
                if applied > 0 {
                    warn!(
                        buffer = %buffer,
                        handler = %plan.handler_name,
                        "edit failed after {applied} of the session's edits were applied"
                    );
                }
                return Err(err.into());
            }
        }
        Ok(())
    }
}

/// `text` with the characters of `span` replaced by spaces, so a typed trigger character does
/// not break the markup around it while every offset stays valid.
fn blank_span(text: &str, span: TextSpan) -> String {
    text.chars()
        .enumerate()
        .map(|(i, c)| {
            if (span.start..span.end).contains(&i) && c != '\n' {
                ' '
            } else {
                c
            }
        })
        .collect()
}

/// Run one insertion session for `trigger`.
pub async fn run_insertion_session<H, S>(
    host: &H,
    syntax: &S,
    trigger: CursorTrigger,
    config: &SessionConfig,
) -> SessionOutcome
where
    H: Host + ?Sized,
    S: ComponentSyntax<H>,
{
    InsertionSession::new(host, syntax, config, trigger)
        .run()
        .await
}
