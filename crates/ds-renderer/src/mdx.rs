//! MDX preprocessing.

use std::borrow::Cow;

/// Remove top-level ESM `import`/`export` statements from an MDX body.
///
/// Statements may span several lines (`import {\n  A,\n} from "x";`). A
/// statement ends at a line ending with `;`, naming a quoted module after
/// `from`, or not ending in an open `{`, `(` or `,`. Lines inside fenced
/// code blocks are never touched. JSX elements pass through as raw HTML.
#[must_use]
pub fn strip_esm(body: &str) -> Cow<'_, str> {
    if !body.contains("import ") && !body.contains("export ") {
        return Cow::Borrowed(body);
    }

    let mut out = String::with_capacity(body.len());
    let mut fence: Option<&str> = None;
    let mut in_statement = false;
    let mut stripped = false;

    for line in body.split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\n', '\r']);

        if in_statement {
            stripped = true;
            in_statement = !statement_ends(trimmed);
            continue;
        }

        if let Some(marker) = fence {
            if trimmed.trim_start().starts_with(marker) {
                fence = None;
            }
            out.push_str(line);
            continue;
        }

        let start = trimmed.trim_start();
        if start.starts_with("```") || start.starts_with("~~~") {
            fence = Some(&start[..3]);
            out.push_str(line);
            continue;
        }

        if trimmed.starts_with("import ") || trimmed.starts_with("export ") {
            stripped = true;
            in_statement = !statement_ends(trimmed);
            continue;
        }

        out.push_str(line);
    }

    if stripped {
        Cow::Owned(out)
    } else {
        Cow::Borrowed(body)
    }
}

fn statement_ends(line: &str) -> bool {
    let line = line.trim_end();
    if line.ends_with(';') {
        return true;
    }
    if let Some(pos) = line.rfind(" from ") {
        let module = line[pos + 6..].trim_start();
        return module.starts_with('"') || module.starts_with('\'');
    }
    !(line.ends_with('{') || line.ends_with(',') || line.ends_with('('))
}
