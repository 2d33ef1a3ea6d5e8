use async_trait::async_trait;
use futures::executor::block_on;
use handler_core::{
    BufferId, DefinitionTarget, Host, HostError, InsertionMode, SessionConfig, SessionOutcome,
    TextEdit, run_insertion_session,
};
use handler_core_lsp::{
    LspTextEdit, apply_text_edits, definition_params, locations_from_value,
    plan_to_workspace_edit, trigger_from_command, workspace_edit_text_edits_for_uri,
};
use handler_core_treesitter::TsxSyntax;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::HashMap;

const APP_URI: &str = "file:///src/App.tsx";
const TYPES_URI: &str = "file:///node_modules/ui/index.d.ts";

const APP: &str = "// 😀 emoji before the component
export function Greeting() {
  return <Button label=\"hi 😀\" onPress />;
}
";

const TYPES: &str = "export interface ButtonProps {
  /** 😀 */ onPress?: (event: PressEvent, count: number) => void;
}
";

/// A host that answers definition requests like a language server would (JSON, UTF-16).
struct LspLikeHost {
    documents: RefCell<HashMap<String, String>>,
    definition_requests: RefCell<Vec<Value>>,
    applied: RefCell<Vec<Value>>,
}

impl LspLikeHost {
    fn new() -> Self {
        Self::with_app(APP)
    }

    fn with_app(app: &str) -> Self {
        let documents = HashMap::from([
            (APP_URI.to_string(), app.to_string()),
            (TYPES_URI.to_string(), TYPES.to_string()),
        ]);
        Self {
            documents: RefCell::new(documents),
            definition_requests: RefCell::new(Vec::new()),
            applied: RefCell::new(Vec::new()),
        }
    }

    fn server_definition(&self, params: &Value) -> Value {
        // `onPress` sits on line 2 of App.tsx; everything else has no definition.
        if params["position"]["line"] == 2 {
            json!([{
                "targetUri": TYPES_URI,
                "targetRange": { "start": { "line": 0, "character": 0 }, "end": { "line": 2, "character": 1 } },
                "targetSelectionRange": { "start": { "line": 1, "character": 12 }, "end": { "line": 1, "character": 19 } }
            }])
        } else {
            Value::Null
        }
    }
}

#[async_trait(?Send)]
impl Host for LspLikeHost {
    async fn find_definition(
        &self,
        buffer: &BufferId,
        offset: usize,
    ) -> Result<Vec<DefinitionTarget>, HostError> {
        let text = self.open_buffer(buffer).await?;
        let params = definition_params(buffer.as_str(), &text, offset);
        let response = self.server_definition(&params);
        self.definition_requests.borrow_mut().push(params);

        let mut targets = Vec::new();
        for location in locations_from_value(&response) {
            let target_text = self.open_buffer(&BufferId::new(location.uri.clone())).await?;
            targets.push(location.to_definition_target(&target_text));
        }
        Ok(targets)
    }

    async fn open_buffer(&self, buffer: &BufferId) -> Result<String, HostError> {
        self.documents
            .borrow()
            .get(buffer.as_str())
            .cloned()
            .ok_or_else(|| HostError::BufferNotFound(buffer.clone()))
    }

    async fn prompt_user(&self, _default_value: &str) -> Result<Option<String>, HostError> {
        Ok(None)
    }

    fn apply_edit(&self, buffer: &BufferId, edit: &TextEdit) -> Result<(), HostError> {
        let mut documents = self.documents.borrow_mut();
        let text = documents
            .get_mut(buffer.as_str())
            .ok_or_else(|| HostError::BufferNotFound(buffer.clone()))?;
        let line_index = handler_core::LineIndex::from_text(text);
        let lsp_edit = LspTextEdit::from_text_edit(&line_index, edit);
        *text = apply_text_edits(text, std::slice::from_ref(&lsp_edit));
        self.applied.borrow_mut().push(lsp_edit.to_value());
        Ok(())
    }
}

#[test]
fn test_command_to_workspace_edit_with_utf16_positions() {
    let host = LspLikeHost::new();

    // The cursor right after `onPress` is UTF-16 column 38 on line 2 (the emoji in the label
    // counts twice).
    let args = json!({
        "textDocument": { "uri": APP_URI },
        "range": { "start": { "line": 2, "character": 38 }, "end": { "line": 2, "character": 38 } },
        "eventName": "onPress",
        "mode": "direct"
    });
    let trigger = trigger_from_command(&args, APP).unwrap();
    assert_eq!(trigger.mode(), InsertionMode::Direct);

    let outcome = block_on(run_insertion_session(
        &host,
        &TsxSyntax::new(),
        trigger,
        &SessionConfig::default(),
    ));
    let SessionOutcome::Inserted(report) = outcome else {
        panic!("expected an insertion, got {outcome:?}");
    };

    let updated = host.documents.borrow()[APP_URI].clone();
    assert_eq!(
        updated,
        "// 😀 emoji before the component
const handleOnPress = (event: PressEvent, count: number) => {};

export function Greeting() {
  return <Button label=\"hi 😀\" onPress={handleOnPress} />;
}
"
    );

    // The definition lookup targeted the prop name, in UTF-16 columns.
    assert_eq!(
        host.definition_requests.borrow()[0]["position"],
        json!({ "line": 2, "character": 31 })
    );

    // The same plan, expressed as one WorkspaceEdit against the original text.
    let workspace_edit = plan_to_workspace_edit(APP_URI, APP, &report.plan);
    let edits = workspace_edit_text_edits_for_uri(&workspace_edit, APP_URI);
    assert_eq!(apply_text_edits(APP, &edits), updated);
    assert_eq!(host.applied.borrow().len(), 2);
}

#[test]
fn test_command_with_typed_trigger_character() {
    let app = APP.replace("onPress />", "onPress! />");
    let host = LspLikeHost::with_app(&app);

    let args = json!({
        "textDocument": { "uri": APP_URI },
        "range": { "start": { "line": 2, "character": 38 }, "end": { "line": 2, "character": 39 } },
        "eventName": "onPress"
    });
    let trigger = trigger_from_command(&args, &app).unwrap();

    let outcome = block_on(run_insertion_session(
        &host,
        &TsxSyntax::new(),
        trigger,
        &SessionConfig::default(),
    ));
    assert!(outcome.is_inserted(), "{outcome:?}");

    assert_eq!(
        host.documents.borrow()[APP_URI],
        "// 😀 emoji before the component
const handleOnPress = (event: PressEvent, count: number) => {};

export function Greeting() {
  return <Button label=\"hi 😀\" onPress={handleOnPress} />;
}
"
    );
}
