use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::process::Command;

const APP: &str = "import React from 'react';

export class Panel extends React.Component<PanelProps> {
  render() {
    return <Button onClick />;
  }
}
";

const TYPES: &str = "interface ButtonProps {
  onClick?: (event: React.MouseEvent<HTMLButtonElement>) => void;
}
";

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("handler-cli-{}-{name}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn trigger_offset() -> usize {
    let byte = APP.find("onClick />").unwrap() + "onClick".len();
    APP[..byte].chars().count()
}

#[test]
fn test_prints_updated_file() {
    let dir = scratch_dir("print");
    let app = dir.join("Panel.tsx");
    let types = dir.join("button.d.ts");
    std::fs::write(&app, APP).unwrap();
    std::fs::write(&types, TYPES).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_handler-cli"))
        .arg(&app)
        .arg(trigger_offset().to_string())
        .arg("onClick")
        .arg("--decl")
        .arg(&types)
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "import React from 'react';

export class Panel extends React.Component<PanelProps> {
  render() {
    return <Button onClick={this.handleOnClick} />;
  }

  handleOnClick = (event: React.MouseEvent<HTMLButtonElement>) => {};
}
"
    );
    // Without --write the file is untouched.
    assert_eq!(std::fs::read_to_string(&app).unwrap(), APP);
}

#[test]
fn test_abort_exits_with_code_two() {
    let dir = scratch_dir("abort");
    let app = dir.join("Panel.tsx");
    std::fs::write(&app, APP).unwrap();

    // No declaration file and no member in the edited file: nothing to resolve.
    let output = Command::new(env!("CARGO_BIN_EXE_handler-cli"))
        .arg(&app)
        .arg(trigger_offset().to_string())
        .arg("onClick")
        .arg("--write")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no handler inserted"));
    assert_eq!(std::fs::read_to_string(&app).unwrap(), APP);
}

#[test]
fn test_usage_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_handler-cli"))
        .arg("only-one-arg.tsx")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage: handler-cli"));
}

#[test]
fn test_writes_function_component_with_typed_trigger() {
    let dir = scratch_dir("typed");
    let app = dir.join("Toggle.tsx");
    let types = dir.join("switch.d.ts");
    let text = "export const Toggle = () => {\n  return <Switch onChange! />;\n};\n";
    std::fs::write(&app, text).unwrap();
    std::fs::write(&types, "interface SwitchProps {\n  onChange?: (checked: boolean) => void;\n}\n").unwrap();

    let offset = text.find("onChange!").unwrap() + "onChange".len();
    let output = Command::new(env!("CARGO_BIN_EXE_handler-cli"))
        .arg(&app)
        .arg(offset.to_string())
        .arg("onChange")
        .args(["--trigger-len", "1", "--write", "--decl"])
        .arg(&types)
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(output.stdout.is_empty());
    assert_eq!(
        std::fs::read_to_string(&app).unwrap(),
        "const handleOnChange = (checked: boolean) => {};\n\nexport const Toggle = () => {\n  return <Switch onChange={handleOnChange} />;\n};\n"
    );
}
