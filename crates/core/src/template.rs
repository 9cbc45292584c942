pub const DEFAULT_TEMPLATE: &str = "{name}_{date}{ext}";

/// Values substituted into a filename template for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateVars {
    /// File name without its extension.
    pub name: String,
    pub date: String,
    /// Extension including the leading dot, or empty.
    pub ext: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePart {
    Literal(String),
    Token(Token),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Name,
    Date,
    Ext,
}

impl Token {
    const ALL: [Token; 3] = [Token::Name, Token::Date, Token::Ext];

    pub fn placeholder(self) -> &'static str {
        match self {
            Token::Name => "{name}",
            Token::Date => "{date}",
            Token::Ext => "{ext}",
        }
    }
}

/// Splits a template into literal text and the recognised placeholders.
///
/// Brace sequences that are not one of `{name}`, `{date}` or `{ext}` stay in
/// the literal text untouched, so parsing never fails.
pub fn parse_template(input: &str) -> Vec<TemplatePart> {
    let mut parts = Vec::new();
    let mut literal = String::new();
    let mut rest = input;

    while let Some(ch) = rest.chars().next() {
        if ch == '{' {
            if let Some(token) = Token::ALL
                .into_iter()
                .find(|token| rest.starts_with(token.placeholder()))
            {
                if !literal.is_empty() {
                    parts.push(TemplatePart::Literal(std::mem::take(&mut literal)));
                }
                parts.push(TemplatePart::Token(token));
                rest = &rest[token.placeholder().len()..];
                continue;
            }
        }
        literal.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    if !literal.is_empty() {
        parts.push(TemplatePart::Literal(literal));
    }

    parts
}

pub fn render_template(parts: &[TemplatePart], vars: &TemplateVars) -> String {
    let mut output = String::new();
    for part in parts {
        match part {
            TemplatePart::Literal(s) => output.push_str(s),
            TemplatePart::Token(Token::Name) => output.push_str(&vars.name),
            TemplatePart::Token(Token::Date) => output.push_str(&vars.date),
            TemplatePart::Token(Token::Ext) => output.push_str(&vars.ext),
        }
    }
    output
}

pub fn apply_template(template: &str, vars: &TemplateVars) -> String {
    render_template(&parse_template(template), vars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> TemplateVars {
        TemplateVars {
            name: "file".to_string(),
            date: "012345".to_string(),
            ext: ".mp3".to_string(),
        }
    }

    #[test]
    fn default_template_renders_name_date_ext() {
        assert_eq!(apply_template(DEFAULT_TEMPLATE, &vars()), "file_012345.mp3");
    }

    #[test]
    fn replaces_every_occurrence() {
        assert_eq!(
            apply_template("{name}_{date}_{name}{ext}", &vars()),
            "file_012345_file.mp3"
        );
    }

    #[test]
    fn unknown_placeholders_are_left_verbatim() {
        assert_eq!(
            apply_template("{unknown}_{another}", &vars()),
            "{unknown}_{another}"
        );
        assert_eq!(apply_template("{Name}{ext", &vars()), "{Name}{ext");
    }

    #[test]
    fn template_without_placeholders_is_unchanged() {
        assert_eq!(apply_template("plain-name.txt", &vars()), "plain-name.txt");
        assert_eq!(apply_template("", &vars()), "");
    }

    #[test]
    fn nested_brace_before_placeholder_is_literal() {
        assert_eq!(apply_template("{{name}}", &vars()), "{file}");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let v = TemplateVars {
            name: "{date}".to_string(),
            date: "240115".to_string(),
            ext: String::new(),
        };
        assert_eq!(apply_template("{name}-{date}", &v), "{date}-240115");
    }

    #[test]
    fn parse_splits_literals_and_tokens() {
        assert_eq!(
            parse_template("{date}/{name}{ext}"),
            vec![
                TemplatePart::Token(Token::Date),
                TemplatePart::Literal("/".to_string()),
                TemplatePart::Token(Token::Name),
                TemplatePart::Token(Token::Ext),
            ]
        );
    }

    #[test]
    fn handles_multibyte_literals() {
        assert_eq!(apply_template("写真_{name}{ext}", &vars()), "写真_file.mp3");
    }
}
