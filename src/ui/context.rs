use is_terminal::IsTerminal;

/// Capabilities the event renderer adapts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiContext {
    pub color: bool,
    pub unicode: bool,
}

impl UiContext {
    pub fn detect() -> Self {
        detect_impl(
            |key| std::env::var(key).ok(),
            std::io::stdout().is_terminal(),
        )
    }
}

fn detect_impl(get_env: impl Fn(&str) -> Option<String>, is_tty: bool) -> UiContext {
    let term = get_env("TERM").unwrap_or_default();
    let term_is_dumb = term.eq_ignore_ascii_case("dumb");
    let no_color = get_env("NO_COLOR").is_some();

    UiContext {
        color: is_tty && !term_is_dumb && !no_color,
        unicode: !term_is_dumb && unicode_locale(&get_env),
    }
}

fn unicode_locale(get_env: &impl Fn(&str) -> Option<String>) -> bool {
    const KEYS: &[&str] = &["LC_ALL", "LC_CTYPE", "LANG"];
    for key in KEYS {
        if let Some(val) = get_env(key) {
            let v = val.to_lowercase();
            return v.contains("utf-8") || v.contains("utf8");
        }
    }
    // no locale set at all: modern default
    true
}
