//! Handler synthesis.
//!
//! Turns a located construct, a resolved parameter list and a handler name into an
//! [`InsertionPlan`]: the stub edit and (optionally) the binding-expression edit. Planning is
//! pure; nothing is applied here.

use crate::construct::{ComponentConstruct, ConstructKind, ConstructShape, TextSpan};
use crate::host::TextEdit;
use crate::indent::{
    IndentSettings, compute_body_indent, leading_whitespace, line_indent, render_indent,
};
use crate::line_index::LineIndex;
use crate::signature::{HandlerParam, render_params};
use handler_core_lang::{ClassStubStyle, FunctionStubStyle, HandlerStyle};

/// Where and how the binding expression is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingSite {
    /// Span replaced by the binding (the trigger character span).
    pub span: TextSpan,
    /// Receiver written before the handler name (`this.` or empty).
    pub bind_object: String,
}

/// The edits of one insertion session, computed before anything is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionPlan {
    /// Name of the generated handler.
    pub handler_name: String,
    /// Indentation used for the stub line.
    pub indent: String,
    /// Stub insertion.
    pub stub: TextEdit,
    /// Binding-expression replacement at the trigger, if any.
    pub binding: Option<TextEdit>,
}

impl InsertionPlan {
    /// All edits, ordered by descending start offset.
    ///
    /// Applying them in this order keeps every offset valid without re-computation.
    pub fn edits(&self) -> Vec<&TextEdit> {
        let mut edits = std::iter::once(&self.stub)
            .chain(self.binding.as_ref())
            .collect::<Vec<_>>();
        edits.sort_by_key(|edit| std::cmp::Reverse(edit.range.start));
        edits
    }
}

/// Builds stub text and insertion plans.
#[derive(Debug, Clone, Copy)]
pub struct HandlerSynthesizer<'a> {
    style: &'a HandlerStyle,
    indent: &'a IndentSettings,
}

impl<'a> HandlerSynthesizer<'a> {
    /// Create a synthesizer for the given stub style and buffer indentation.
    pub fn new(style: &'a HandlerStyle, indent: &'a IndentSettings) -> Self {
        Self { style, indent }
    }

    /// Indent width (in indent units) for a stub targeting `construct`.
    ///
    /// Class form uses the minimum body indentation, or the class line's indentation plus one
    /// level when the body has no non-blank lines. Function form uses the declaration's own
    /// indentation.
    pub fn indent_width(&self, index: &LineIndex, construct: &ComponentConstruct) -> usize {
        match construct {
            ComponentConstruct::Class(class) => {
                let width = compute_body_indent(index, class.body, self.indent);
                if width > 0 {
                    width
                } else {
                    line_indent(index, class.body.start, self.indent) + self.indent.level_width()
                }
            }
            ComponentConstruct::Function(function) => {
                line_indent(index, function.anchor.start, self.indent)
            }
        }
    }

    /// The single-line stub for `kind`, without indentation.
    pub fn stub_text(&self, kind: ConstructKind, name: &str, params: &[HandlerParam]) -> String {
        let params = render_params(params, self.style.type_annotations);
        match kind {
            ConstructKind::Class => match self.style.class_stub {
                ClassStubStyle::ArrowProperty => format!("{name} = ({params}) => {{}};"),
                ClassStubStyle::Method => format!("{name}({params}) {{}}"),
            },
            ConstructKind::Function => match self.style.function_stub {
                FunctionStubStyle::ConstArrow => format!("const {name} = ({params}) => {{}};"),
                FunctionStubStyle::Declaration => format!("function {name}({params}) {{}}"),
            },
        }
    }

    /// Plan the insertion of `handler_name` into (class form) or before (function form)
    /// `construct`.
    pub fn plan(
        &self,
        index: &LineIndex,
        construct: &ComponentConstruct,
        params: &[HandlerParam],
        indent_width: usize,
        handler_name: &str,
        binding: Option<BindingSite>,
    ) -> InsertionPlan {
        let indent = render_indent(indent_width, self.indent);
        let stub_line = self.stub_text(construct.kind(), handler_name, params);

        let stub = match construct {
            ComponentConstruct::Class(_) => {
                class_member_edit(index, construct.body_span(), &indent, &stub_line)
            }
            ComponentConstruct::Function(function) => {
                sibling_edit(index, function.anchor, &indent, &stub_line)
            }
        };

        let binding = binding.map(|site| {
            TextEdit::replace(
                site.span,
                format!("={{{}{}}}", site.bind_object, handler_name),
            )
        });

        InsertionPlan {
            handler_name: handler_name.to_string(),
            indent,
            stub,
            binding,
        }
    }
}

/// Insert `stub_line` as the last member of a braced body.
fn class_member_edit(index: &LineIndex, body: TextSpan, indent: &str, stub_line: &str) -> TextEdit {
    let close = body.end.saturating_sub(1);
    let (close_line, close_col) = index.char_offset_to_position(close);
    let line_start = index.line_start(close_line);
    let before_close = index.slice(line_start, line_start + close_col);

    if before_close.trim().is_empty() && line_start > body.start {
        // `}` sits on its own line: insert full lines right above it.
        let has_members = !index.slice(body.start + 1, line_start).trim().is_empty();
        let separator = if has_members { "\n" } else { "" };
        return TextEdit::insert(line_start, format!("{separator}{indent}{stub_line}\n"));
    }

    // `}` shares its line with other text (`class A extends Component {}`).
    let close_indent = leading_whitespace(index, close);
    TextEdit::insert(close, format!("\n{indent}{stub_line}\n{close_indent}"))
}

/// Insert `stub_line` as a sibling statement right before `anchor`.
fn sibling_edit(index: &LineIndex, anchor: TextSpan, indent: &str, stub_line: &str) -> TextEdit {
    let (line, col) = index.char_offset_to_position(anchor.start);
    let line_start = index.line_start(line);
    let before_anchor = index.slice(line_start, line_start + col);

    if before_anchor.trim().is_empty() {
        TextEdit::insert(line_start, format!("{indent}{stub_line}\n\n"))
    } else {
        TextEdit::insert(anchor.start, format!("{stub_line}\n\n{indent}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construct::{ClassConstruct, FunctionConstruct};
    use pretty_assertions::assert_eq;

    fn apply(text: &str, plan: &InsertionPlan) -> String {
        let mut chars = text.chars().collect::<Vec<_>>();
        for edit in plan.edits() {
            chars.splice(edit.range.start..edit.range.end, edit.text.chars());
        }
        chars.into_iter().collect()
    }

    fn class_construct(text: &str) -> ComponentConstruct {
        let start = text.find("class").unwrap();
        let open = text.find('{').unwrap();
        let close = text.rfind('}').unwrap() + 1;
        ComponentConstruct::Class(ClassConstruct {
            name: Some("App".to_string()),
            span: TextSpan::new(start, close),
            body: TextSpan::new(open, close),
        })
    }

    #[test]
    fn test_class_stub_goes_before_closing_brace() {
        let text = "class App extends Component {\n  render() {\n    return <Button onClick! />;\n  }\n}\n";
        let construct = class_construct(text);
        let index = LineIndex::from_text(text);
        let style = HandlerStyle::default();
        let settings = IndentSettings::spaces(2);
        let synth = HandlerSynthesizer::new(&style, &settings);

        let trigger = text.find('!').unwrap();
        let width = synth.indent_width(&index, &construct);
        assert_eq!(width, 2);

        let plan = synth.plan(
            &index,
            &construct,
            &[HandlerParam::new("e", Some("Event"))],
            width,
            "handleOnClick",
            Some(BindingSite {
                span: TextSpan::new(trigger, trigger + 1),
                bind_object: "this.".to_string(),
            }),
        );

        assert_eq!(
            apply(text, &plan),
            "class App extends Component {\n  render() {\n    return <Button onClick={this.handleOnClick} />;\n  }\n\n  handleOnClick = (e: Event) => {};\n}\n"
        );
    }

    #[test]
    fn test_empty_one_line_class_gets_default_level() {
        let text = "  class App extends Component {}\n";
        let construct = class_construct(text);
        let index = LineIndex::from_text(text);
        let style = HandlerStyle::default().with_class_stub(ClassStubStyle::Method);
        let settings = IndentSettings::spaces(4);
        let synth = HandlerSynthesizer::new(&style, &settings);

        let width = synth.indent_width(&index, &construct);
        assert_eq!(width, 6);

        let plan = synth.plan(&index, &construct, &[], width, "handleOnOpen", None);
        assert_eq!(plan.binding, None);
        assert_eq!(
            apply(text, &plan),
            "  class App extends Component {\n      handleOnOpen() {}\n  }\n"
        );
    }

    #[test]
    fn test_function_stub_goes_before_export_statement() {
        let text = "import React from 'react';\n\nexport const App = () => {\n\treturn <Switch onChange! />;\n};\n";
        let anchor_start = text.find("export").unwrap();
        let construct = ComponentConstruct::Function(FunctionConstruct {
            name: Some("App".to_string()),
            span: TextSpan::new(text.find("App").unwrap(), text.len() - 2),
            body: TextSpan::new(text.find("=> {").unwrap() + 3, text.len() - 2),
            anchor: TextSpan::new(anchor_start, text.len() - 1),
        });
        let index = LineIndex::from_text(text);
        let style = HandlerStyle::javascript();
        let settings = IndentSettings::tabs(4);
        let synth = HandlerSynthesizer::new(&style, &settings);

        let width = synth.indent_width(&index, &construct);
        assert_eq!(width, 0);

        let trigger = text.find('!').unwrap();
        let plan = synth.plan(
            &index,
            &construct,
            &[
                HandlerParam::new("checked", Some("boolean")),
                HandlerParam::new("event", Some("Event")),
            ],
            width,
            "handleOnChange",
            Some(BindingSite {
                span: TextSpan::new(trigger, trigger + 1),
                bind_object: String::new(),
            }),
        );

        assert_eq!(
            apply(text, &plan),
            "import React from 'react';\n\nconst handleOnChange = (checked, event) => {};\n\nexport const App = () => {\n\treturn <Switch onChange={handleOnChange} />;\n};\n"
        );
    }

    #[test]
    fn test_edits_are_ordered_descending() {
        let plan = InsertionPlan {
            handler_name: "h".to_string(),
            indent: String::new(),
            stub: TextEdit::insert(3, "a"),
            binding: Some(TextEdit::insert(10, "b")),
        };
        let starts = plan.edits().iter().map(|e| e.range.start).collect::<Vec<_>>();
        assert_eq!(starts, vec![10, 3]);
    }

    #[test]
    fn test_stub_styles() {
        let settings = IndentSettings::default();
        let params = [HandlerParam::new("value", Some("string"))];

        let style = HandlerStyle::default().with_function_stub(FunctionStubStyle::Declaration);
        let synth = HandlerSynthesizer::new(&style, &settings);
        assert_eq!(
            synth.stub_text(ConstructKind::Function, "handleOnSearch", &params),
            "function handleOnSearch(value: string) {}"
        );
        assert_eq!(
            synth.stub_text(ConstructKind::Class, "handleOnSearch", &params),
            "handleOnSearch = (value: string) => {};"
        );
    }
}
