use std::borrow::Cow;
use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Expand `{{ env.VAR }}` placeholders in raw configuration text
///
/// `{{ env.VAR | default("fallback") }}` substitutes the fallback when the
/// variable is unset. Comment lines are left untouched so commented-out
/// secrets never have to exist in the environment.
pub fn expand_env(input: &str) -> Result<String, String> {
    let lines = input
        .split('\n')
        .map(|line| {
            if line.trim_start().starts_with('#') {
                Ok(Cow::Borrowed(line))
            } else {
                expand_line(line)
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(lines.join("\n"))
}

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Group 1: scoped key, group 2: optional default("...") argument
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*([a-zA-Z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#).expect("must be valid regex")
    })
}

fn expand_line(line: &str) -> Result<Cow<'_, str>, String> {
    if !placeholder().is_match(line) {
        return Ok(Cow::Borrowed(line));
    }

    let mut expanded = String::with_capacity(line.len());
    let mut cursor = 0;

    for captures in placeholder().captures_iter(line) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        expanded.push_str(&line[cursor..whole.start()]);
        expanded.push_str(&resolve(&captures)?);
        cursor = whole.end();
    }

    expanded.push_str(&line[cursor..]);
    Ok(Cow::Owned(expanded))
}

fn resolve(captures: &Captures<'_>) -> Result<String, String> {
    let key = captures.get(1).map_or("", |m| m.as_str());
    let fallback = captures.get(2).map(|m| m.as_str());

    let Some(var_name) = key.strip_prefix("env.").filter(|name| !name.contains('.')) else {
        return Err(format!("only variables scoped with 'env.' are supported: `{key}`"));
    };

    match (std::env::var(var_name), fallback) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(fallback)) => Ok(fallback.to_string()),
        (Err(_), None) => Err(format!("environment variable not found: `{var_name}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_unchanged() {
        let input = "[provider]\nbase_url = \"https://api.replicate.com/v1\"\n";
        assert_eq!(expand_env(input).unwrap(), input);
    }

    #[test]
    fn token_is_substituted() {
        temp_env::with_var("BREWSHOT_TEST_TOKEN", Some("r8_secret"), || {
            let result = expand_env("api_token = \"{{ env.BREWSHOT_TEST_TOKEN }}\"").unwrap();
            assert_eq!(result, "api_token = \"r8_secret\"");
        });
    }

    #[test]
    fn several_placeholders_on_one_line() {
        let vars = [("BREWSHOT_HOST", Some("0.0.0.0")), ("BREWSHOT_PORT", Some("8080"))];
        temp_env::with_vars(vars, || {
            let result = expand_env("listen_address = \"{{ env.BREWSHOT_HOST }}:{{ env.BREWSHOT_PORT }}\"").unwrap();
            assert_eq!(result, "listen_address = \"0.0.0.0:8080\"");
        });
    }

    #[test]
    fn unset_variable_is_an_error() {
        temp_env::with_var_unset("BREWSHOT_UNSET", || {
            let err = expand_env("api_token = \"{{ env.BREWSHOT_UNSET }}\"").unwrap_err();
            assert!(err.contains("BREWSHOT_UNSET"));
        });
    }

    #[test]
    fn default_covers_unset_variable() {
        temp_env::with_var_unset("BREWSHOT_MODEL", || {
            let result = expand_env("text_model = \"{{ env.BREWSHOT_MODEL | default(\"openai/o4-mini\") }}\"").unwrap();
            assert_eq!(result, "text_model = \"openai/o4-mini\"");
        });
    }

    #[test]
    fn set_variable_wins_over_default() {
        temp_env::with_var("BREWSHOT_MODEL", Some("openai/gpt-5"), || {
            let result = expand_env("text_model = \"{{ env.BREWSHOT_MODEL | default(\"openai/o4-mini\") }}\"").unwrap();
            assert_eq!(result, "text_model = \"openai/gpt-5\"");
        });
    }

    #[test]
    fn comments_are_not_expanded() {
        temp_env::with_var_unset("BREWSHOT_UNSET", || {
            let input = "  # api_token = \"{{ env.BREWSHOT_UNSET }}\"\nwait_seconds = 60";
            assert_eq!(expand_env(input).unwrap(), input);
        });
    }

    #[test]
    fn non_env_scope_is_rejected() {
        let err = expand_env("key = \"{{ secrets.TOKEN }}\"").unwrap_err();
        assert!(err.contains("only variables scoped with 'env.'"));
    }
}
