//! Ready-made custom rules used by page builds.

use std::path::Path;

use crate::error::RewriterResult;
use crate::rewrite::{CustomRule, Replacement};

/// `<!-- dist-path -->` becomes `/dist/` followed by the directory of the document being processed.
pub fn dist_path_rule() -> RewriterResult<CustomRule> {
    CustomRule::new(
        r"(?i)<!--\s*dist-path\s*-->",
        Replacement::computed(|ctx| {
            let dir = Path::new(ctx.file_path)
                .parent()
                .map(|parent| parent.to_string_lossy().replace('\\', "/"))
                .unwrap_or_default();
            format!("/dist/{dir}")
        }),
    )
}

/// Inject a script before `</head>` that reloads the page whenever `endpoint` emits a change.
pub fn live_reload_rule(endpoint: &str) -> RewriterResult<CustomRule> {
    // Quoted as a JS string; `$` doubled so the literal replacement does not expand it.
    let endpoint = serde_json::to_string(endpoint)
        .unwrap_or_else(|_| "\"/esbuild\"".into())
        .replace('$', "$$");
    CustomRule::new(
        "</head>",
        format!(
            "<script>new EventSource({endpoint}).addEventListener('change', () => window.location.reload())</script></head>"
        ),
    )
}
