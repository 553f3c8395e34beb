//! Comment widget markup

use crate::config::CommentsConfig;

/// Utterances mount point plus the script that fills it
///
/// The injected script only runs when the mount point exists and is still
/// empty, so re-running it never mounts a second widget.
pub fn comments_widget(config: &CommentsConfig) -> String {
    if !config.enabled() {
        return String::new();
    }

    format!(
        r#"<section id="comments" class="comments"></section>
<script>
(function () {{
  var mount = document.getElementById('comments');
  if (!mount || mount.childNodes.length) {{
    return;
  }}
  var script = document.createElement('script');
  script.src = '{script}';
  script.async = true;
  script.crossOrigin = 'anonymous';
  script.setAttribute('repo', '{repo}');
  script.setAttribute('issue-term', '{issue_term}');
  script.setAttribute('label', '{label}');
  script.setAttribute('theme', '{theme}');
  mount.appendChild(script);
}})();
</script>"#,
        script = js_string(&config.script),
        repo = js_string(&config.repo),
        issue_term = js_string(&config.issue_term),
        label = js_string(&config.label),
        theme = js_string(&config.theme),
    )
}

/// Escape a value for a single-quoted JS string inside a script element
fn js_string(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_without_repo() {
        assert_eq!(comments_widget(&CommentsConfig::default()), "");
    }

    #[test]
    fn test_widget_is_guarded() {
        let config = CommentsConfig {
            repo: "AgnaldoCordeiro/blog".to_string(),
            ..CommentsConfig::default()
        };
        let html = comments_widget(&config);
        assert!(html.contains(r#"<section id="comments""#));
        assert!(html.contains("if (!mount || mount.childNodes.length)"));
        assert!(html.contains("script.setAttribute('repo', 'AgnaldoCordeiro/blog');"));
        assert!(html.contains("script.setAttribute('theme', 'github-dark');"));
    }

    #[test]
    fn test_values_are_escaped() {
        let config = CommentsConfig {
            repo: "a'</script>".to_string(),
            ..CommentsConfig::default()
        };
        let html = comments_widget(&config);
        assert!(!html.contains("a'</script>"));
    }
}
