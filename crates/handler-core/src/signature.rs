//! Callback signature resolution.
//!
//! Recovers the parameter list of a callback member from a slice of type-declaration source,
//! e.g. `onChange?: (checked: boolean, event: MouseEvent) => void;`. Only the parenthesized
//! parameter list is parsed; type text is kept as an opaque label with whitespace collapsed.
//!
//! Unparsable input resolves to `None`; an empty parameter list resolves to `Some(vec![])`.

/// One parameter of a resolved callback signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerParam {
    /// Parameter name. Destructuring patterns are kept verbatim.
    pub name: String,
    /// Declared type text, if any.
    pub type_label: Option<String>,
    /// Declared with `?` (or with a default value).
    pub optional: bool,
    /// Declared as a rest parameter (`...args`).
    pub rest: bool,
}

impl HandlerParam {
    /// A required, non-rest parameter.
    pub fn new(name: impl Into<String>, type_label: Option<&str>) -> Self {
        Self {
            name: name.into(),
            type_label: type_label.map(str::to_string),
            optional: false,
            rest: false,
        }
    }

    /// Render the parameter as it should appear in a stub signature.
    pub fn render(&self, with_types: bool) -> String {
        let mut out = String::new();
        if self.rest {
            out.push_str("...");
        }
        out.push_str(&self.name);
        if with_types {
            if self.optional && !self.rest {
                out.push('?');
            }
            if let Some(label) = self.type_label.as_deref() {
                out.push_str(": ");
                out.push_str(label);
            }
        }
        out
    }
}

/// Render a parameter list as comma-separated stub parameters.
pub fn render_params(params: &[HandlerParam], with_types: bool) -> String {
    params
        .iter()
        .map(|p| p.render(with_types))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolve the parameter list of a callback declaration.
///
/// Accepted shapes:
/// - function types: `(a: A, b?: B) => R`, optionally with type parameters `<T>(v: T) => R`
/// - wrapped or unioned function types: `((e: E) => void) | undefined`
/// - property members: `onChange?: (e: E) => void;`
/// - method members: `onChange(e: E): void;`
pub fn resolve(declaration: &str) -> Option<Vec<HandlerParam>> {
    let text = strip_comments(declaration);
    let text = text
        .trim()
        .trim_end_matches([';', ','])
        .trim_end();
    if text.is_empty() {
        return None;
    }

    resolve_function_type(text).or_else(|| resolve_member(text))
}

fn resolve_member(text: &str) -> Option<Vec<HandlerParam>> {
    let mut rest = text;
    for modifier in ["readonly ", "declare "] {
        if let Some(stripped) = rest.strip_prefix(modifier) {
            rest = stripped.trim_start();
        }
    }

    let name_len = member_name_len(rest)?;
    let mut rest = rest[name_len..].trim_start();
    if let Some(stripped) = rest.strip_prefix('?') {
        rest = stripped.trim_start();
    }

    if let Some(type_text) = rest.strip_prefix(':') {
        return resolve_function_type(type_text.trim());
    }

    if rest.starts_with('(') || rest.starts_with('<') {
        let rest = skip_type_parameters(rest)?;
        let (inner, after) = split_parenthesized(rest)?;
        let after = after.trim_start();
        if after.is_empty() || after.starts_with(':') {
            return split_params(inner);
        }
    }

    None
}

fn member_name_len(text: &str) -> Option<usize> {
    let first = text.chars().next()?;
    if first == '"' || first == '\'' {
        let close = text[1..].find(first)?;
        return Some(close + 2);
    }

    let len = text
        .char_indices()
        .take_while(|(_, c)| is_ident_char(*c))
        .last()
        .map(|(i, c)| i + c.len_utf8())?;
    if first.is_ascii_digit() {
        return None;
    }
    Some(len)
}

fn resolve_function_type(text: &str) -> Option<Vec<HandlerParam>> {
    let text = text.trim();

    let alternatives = split_top_level(text, '|');
    if alternatives.len() > 1 {
        return alternatives
            .into_iter()
            .find_map(|alt| resolve_function_type(alt.trim()));
    }

    let rest = skip_type_parameters(text)?;
    let (inner, after) = split_parenthesized(rest)?;
    if after.trim_start().starts_with("=>") {
        return split_params(inner);
    }

    // `((e: E) => void)` parenthesizes the whole function type.
    if after.trim().is_empty() {
        return resolve_function_type(inner);
    }

    None
}

fn skip_type_parameters(text: &str) -> Option<&str> {
    if !text.starts_with('<') {
        return Some(text);
    }

    let mut depth = 0usize;
    let mut prev = '\0';
    for (i, c) in text.char_indices() {
        match c {
            '<' => depth += 1,
            '>' if prev != '=' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(text[i + 1..].trim_start());
                }
            }
            _ => {}
        }
        prev = c;
    }
    None
}

/// Split `(inner) after` at the parenthesis matching the leading `(`.
fn split_parenthesized(text: &str) -> Option<(&str, &str)> {
    if !text.starts_with('(') {
        return None;
    }

    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    if c != ')' {
                        return None;
                    }
                    return Some((&text[1..i], &text[i + 1..]));
                }
            }
            _ => {}
        }
    }
    None
}

/// Split `text` at `separator` occurrences outside brackets and string literals.
fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0isize;
    let mut quote: Option<char> = None;
    let mut prev = '\0';
    let mut start = 0usize;

    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            prev = c;
            continue;
        }
        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '(' | '[' | '{' | '<' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            '>' if prev != '=' => depth -= 1,
            c if c == separator && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
        prev = c;
    }
    parts.push(&text[start..]);
    parts
}

enum ParsedParam {
    Param(HandlerParam),
    /// TypeScript's `this:` pseudo-parameter; it does not exist at runtime.
    This,
}

fn split_params(inner: &str) -> Option<Vec<HandlerParam>> {
    let pieces = split_top_level(inner, ',');
    let last = pieces.len() - 1;
    let mut params = Vec::with_capacity(pieces.len());

    for (i, piece) in pieces.into_iter().enumerate() {
        let piece = piece.trim();
        if piece.is_empty() {
            // `()` and a trailing comma are fine; a hole in the middle is not.
            if i == last {
                continue;
            }
            return None;
        }
        match parse_param(piece)? {
            ParsedParam::Param(param) => params.push(param),
            ParsedParam::This => {}
        }
    }

    Some(params)
}

fn parse_param(piece: &str) -> Option<ParsedParam> {
    let mut text = piece;
    for modifier in ["public ", "private ", "protected ", "readonly "] {
        if let Some(stripped) = text.strip_prefix(modifier) {
            text = stripped.trim_start();
        }
    }

    let rest_param = text.starts_with("...");
    if rest_param {
        text = text[3..].trim_start();
    }

    let (name, after) = match text.chars().next()? {
        '{' | '[' => {
            let close = matching_close(text)?;
            (collapse_whitespace(&text[..=close]), text[close + 1..].trim_start())
        }
        _ => {
            let len = member_name_len(text)?;
            if text.starts_with(['"', '\'']) {
                return None;
            }
            (text[..len].to_string(), text[len..].trim_start())
        }
    };

    let mut optional = false;
    let mut after = after;
    if let Some(stripped) = after.strip_prefix('?') {
        optional = true;
        after = stripped.trim_start();
    }

    let type_label = if let Some(type_text) = after.strip_prefix(':') {
        let type_text = match find_default_assignment(type_text) {
            Some(idx) => {
                optional = true;
                &type_text[..idx]
            }
            None => type_text,
        };
        let label = collapse_whitespace(type_text);
        if label.is_empty() {
            return None;
        }
        Some(label)
    } else if after.starts_with('=') && !after.starts_with("=>") {
        optional = true;
        None
    } else if after.is_empty() {
        None
    } else {
        return None;
    };

    if name == "this" {
        return Some(ParsedParam::This);
    }

    Some(ParsedParam::Param(HandlerParam {
        name,
        type_label,
        optional,
        rest: rest_param,
    }))
}

fn matching_close(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '{' | '[' | '(' => depth += 1,
            '}' | ']' | ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Byte index of a top-level `=` that starts a default value (not `=>`, `==`).
fn find_default_assignment(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0isize;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'(' | b'[' | b'{' | b'<' => depth += 1,
            b')' | b']' | b'}' => depth -= 1,
            b'>' if i == 0 || bytes[i - 1] != b'=' => depth -= 1,
            b'=' if depth == 0 => {
                let next = bytes.get(i + 1).copied();
                let prev = if i > 0 { bytes[i - 1] } else { b' ' };
                if next != Some(b'>') && next != Some(b'=') && prev != b'=' && prev != b'!' {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Replace `//` and `/* */` comments (outside string literals) with a single space.
fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }
        match (c, chars.peek()) {
            ('"' | '\'' | '`', _) => {
                quote = Some(c);
                out.push(c);
            }
            ('/', Some('/')) => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }
    out
}

/// Extract one member declaration from declaration source, starting at `start` (a character
/// offset, typically the start of a definition span).
///
/// The slice ends before a `;` or `,` at nesting depth 0, before a closing bracket that would
/// leave the member, or at a line break that does not continue the type.
pub fn declaration_slice(text: &str, start: usize) -> Option<String> {
    let chars = text.chars().skip(start).collect::<Vec<_>>();
    let mut out = String::new();
    let mut depth = 0isize;
    let mut quote: Option<char> = None;
    let mut i = 0usize;

    while i < chars.len() {
        let c = chars[i];
        if let Some(q) = quote {
            out.push(c);
            if c == q {
                quote = None;
            }
            i += 1;
            continue;
        }

        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
                continue;
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                i += 2;
                while i + 1 < chars.len() && !(chars[i] == '*' && chars[i + 1] == '/') {
                    i += 1;
                }
                i += 2;
                out.push(' ');
                continue;
            }
            '(' | '[' | '{' | '<' => depth += 1,
            ')' | ']' | '}' => {
                depth -= 1;
                if depth < 0 {
                    break;
                }
            }
            '>' if !out.ends_with('=') => depth -= 1,
            ';' | ',' if depth == 0 => break,
            '\n' if depth == 0 && !continues_type(&out, &chars[i + 1..]) => break,
            _ => {}
        }
        out.push(c);
        i += 1;
    }

    let out = out.trim();
    if out.is_empty() {
        None
    } else {
        Some(out.to_string())
    }
}

fn continues_type(before: &str, after: &[char]) -> bool {
    let before = before.trim_end();
    if ["=>", ":", "|", "&", "(", ",", "<", "?", "="]
        .iter()
        .any(|token| before.ends_with(token))
    {
        return true;
    }

    let next = after.iter().copied().find(|c| !c.is_whitespace());
    matches!(next, Some('|' | '&' | '='))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_resolves_single_parameter() {
        assert_eq!(
            resolve("(checked: boolean) => void"),
            Some(vec![HandlerParam::new("checked", Some("boolean"))])
        );
    }

    #[test]
    fn test_empty_list_is_not_absence() {
        assert_eq!(resolve("() => void"), Some(vec![]));
        assert_eq!(resolve("not a signature"), None);
        assert_eq!(resolve(""), None);
    }

    #[test]
    fn test_member_property_form() {
        let params = resolve("onChange?: (checked: boolean, event: React.MouseEvent<HTMLButtonElement>) => void;")
            .unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "checked");
        assert_eq!(params[1].name, "event");
        assert_eq!(
            params[1].type_label.as_deref(),
            Some("React.MouseEvent<HTMLButtonElement>")
        );
    }

    #[test]
    fn test_method_member_form() {
        let params = resolve("onSelect(value: string, option: Option): void").unwrap();
        assert_eq!(
            params,
            vec![
                HandlerParam::new("value", Some("string")),
                HandlerParam::new("option", Some("Option")),
            ]
        );
    }

    #[test]
    fn test_optional_rest_and_default_parameters() {
        let params = resolve("(value?: string, size: number = 10, ...rest: any[]) => void").unwrap();
        assert!(params[0].optional);
        assert_eq!(params[0].type_label.as_deref(), Some("string"));
        assert!(params[1].optional);
        assert_eq!(params[1].type_label.as_deref(), Some("number"));
        assert!(params[2].rest);
        assert_eq!(params[2].name, "rest");
        assert_eq!(render_params(&params, true), "value?: string, size?: number, ...rest: any[]");
        assert_eq!(render_params(&params, false), "value, size, ...rest");
    }

    #[test]
    fn test_multiline_signature_with_comments() {
        let text = "(\n  /** current page */\n  page: number,\n  pageSize: number, // size\n) => void";
        let params = resolve(text).unwrap();
        assert_eq!(
            params,
            vec![
                HandlerParam::new("page", Some("number")),
                HandlerParam::new("pageSize", Some("number")),
            ]
        );
    }

    #[test]
    fn test_union_and_wrapped_function_types() {
        let params = resolve("onClick?: ((e: MouseEvent) => void) | undefined").unwrap();
        assert_eq!(params, vec![HandlerParam::new("e", Some("MouseEvent"))]);

        let params = resolve("undefined | ((e: Event) => void)").unwrap();
        assert_eq!(params, vec![HandlerParam::new("e", Some("Event"))]);
    }

    #[test]
    fn test_callback_typed_parameter_keeps_arrow_in_label() {
        let params = resolve("(cb: (err: Error | null) => void, value: string) => void").unwrap();
        assert_eq!(params[0].type_label.as_deref(), Some("(err: Error | null) => void"));
        assert_eq!(params[1].name, "value");
    }

    #[test]
    fn test_generic_signature_and_this_parameter() {
        let params = resolve("<T extends object>(this: Window, record: T, index: number) => void")
            .unwrap();
        assert_eq!(
            params,
            vec![
                HandlerParam::new("record", Some("T")),
                HandlerParam::new("index", Some("number")),
            ]
        );
    }

    #[test]
    fn test_destructured_parameter_kept_verbatim() {
        let params = resolve("({ key, domEvent }: MenuInfo) => void").unwrap();
        assert_eq!(params[0].name, "{ key, domEvent }");
        assert_eq!(params[0].type_label.as_deref(), Some("MenuInfo"));
    }

    #[test]
    fn test_malformed_inputs() {
        assert_eq!(resolve("(a: number"), None);
        assert_eq!(resolve("(a, , b) => void"), None);
        assert_eq!(resolve("(a:) => void"), None);
        assert_eq!(resolve("React.MouseEventHandler<HTMLElement>"), None);
        assert_eq!(resolve("(a: number)"), None);
    }

    #[test]
    fn test_declaration_slice_stops_at_member_end() {
        let source = "interface Props {\n  onChange?: (checked: boolean,\n    event: Event) => void;\n  disabled?: boolean;\n}\n";
        let start = source.find("onChange").unwrap();
        let slice = declaration_slice(source, start).unwrap();
        assert_eq!(slice, "onChange?: (checked: boolean,\n    event: Event) => void");
    }

    #[test]
    fn test_declaration_slice_without_semicolons() {
        let source = "type P = {\n  onOpen: () => void\n  onClose: (\n    reason: string\n  ) => void\n}";
        let start = source.find("onOpen").unwrap();
        assert_eq!(declaration_slice(source, start).unwrap(), "onOpen: () => void");

        let start = source.find("onClose").unwrap();
        let slice = declaration_slice(source, start).unwrap();
        assert_eq!(
            resolve(&slice),
            Some(vec![HandlerParam::new("reason", Some("string"))])
        );
    }

    #[test]
    fn test_declaration_slice_continues_union_on_next_line() {
        let source = "  onPick?:\n    | ((v: string) => void)\n    | undefined;\n";
        let slice = declaration_slice(source, 2).unwrap();
        assert_eq!(
            resolve(&slice),
            Some(vec![HandlerParam::new("v", Some("string"))])
        );
    }
}
