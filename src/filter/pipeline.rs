//! Layered selection and deterministic ordering

use tracing::debug;

use super::presets::{priority_rank, KEY_FILES_PRIORITY};
use super::{FilterContext, Scope};
use crate::core::paths::file_name;

/// Scope layer
fn in_scope(path: &str, ctx: &FilterContext) -> bool {
    let key = ctx.key_files && ctx.is_key_file(path);
    match ctx.scope {
        Scope::All => true,
        Scope::Default => ctx.in_src(path) || key || (ctx.include_tests && ctx.in_tests(path)),
        Scope::SrcOnly => ctx.in_src(path) || (ctx.include_tests && ctx.in_tests(path)),
        Scope::TestsOnly => ctx.in_tests(path) || key,
    }
}

/// Test-inclusion layer
fn passes_test_inclusion(path: &str, ctx: &FilterContext) -> bool {
    !(ctx.scope == Scope::Default && !ctx.include_tests && ctx.in_tests(path))
}

/// Apply every layer to `candidates` and return the survivors in final order
pub fn select(candidates: &[String], ctx: &FilterContext) -> Vec<String> {
    let mut selected: Vec<String> = candidates
        .iter()
        .filter(|path| in_scope(path, ctx))
        .filter(|path| passes_test_inclusion(path, ctx))
        .filter(|path| !ctx.is_dropped(path))
        .filter(|path| ctx.passes_explicit(path))
        .cloned()
        .collect();

    debug!(
        "filter kept {} of {} candidates (scope={})",
        selected.len(),
        candidates.len(),
        ctx.scope
    );

    order(&mut selected, ctx);
    selected
}

/// Sort paths: key files (priority table first), then tests when
/// `tests_first`, then everything else; byte-wise lexical within a group
pub fn order(paths: &mut [String], ctx: &FilterContext) {
    paths.sort_by_cached_key(|path| {
        let key_group = ctx.key_first && ctx.is_key_file(path);
        let rank = if key_group {
            priority_rank(file_name(path)).unwrap_or(KEY_FILES_PRIORITY.len())
        } else {
            KEY_FILES_PRIORITY.len()
        };
        let tests_group = ctx.tests_first && ctx.in_tests(path);
        (!key_group, !tests_group, rank, path.clone())
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterOptions;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn run(candidates: &[&str], options: FilterOptions) -> Vec<String> {
        let ctx = FilterContext::new(options).unwrap();
        select(&strings(candidates), &ctx)
    }

    const TREE: &[&str] = &[
        "README.md",
        "docs/guide.md",
        "pyproject.toml",
        "scripts/deploy.sh",
        "src/a.py",
        "src/api/routes.py",
        "tests/test_a.py",
    ];

    #[test]
    fn test_default_scope_excludes_tests() {
        let selected = run(
            &["src/a.py", "tests/test_a.py", "README.md"],
            FilterOptions::default(),
        );
        assert_eq!(selected, strings(&["README.md", "src/a.py"]));
    }

    #[test]
    fn test_default_scope_with_tests() {
        let selected = run(TREE, FilterOptions::default().with_include_tests(true));
        assert_eq!(
            selected,
            strings(&[
                "pyproject.toml",
                "README.md",
                "src/a.py",
                "src/api/routes.py",
                "tests/test_a.py"
            ])
        );
    }

    #[test]
    fn test_src_only_drops_key_files() {
        let selected = run(TREE, FilterOptions::default().with_scope(Scope::SrcOnly));
        assert_eq!(selected, strings(&["src/a.py", "src/api/routes.py"]));
    }

    #[test]
    fn test_tests_only_keeps_key_files_unless_disabled() {
        let selected = run(TREE, FilterOptions::default().with_scope(Scope::TestsOnly));
        assert_eq!(
            selected,
            strings(&["pyproject.toml", "README.md", "tests/test_a.py"])
        );

        let mut options = FilterOptions::default().with_scope(Scope::TestsOnly);
        options.key_files = false;
        assert_eq!(run(TREE, options), strings(&["tests/test_a.py"]));
    }

    #[test]
    fn test_all_scope_keeps_everything() {
        let mut options = FilterOptions::default().with_scope(Scope::All);
        options.key_first = false;
        let selected = run(TREE, options);
        assert_eq!(selected, strings(TREE));
    }

    #[test]
    fn test_drop_preset_overrides_include() {
        let options = FilterOptions::default()
            .with_include_globs(strings(&["src/**"]))
            .with_drop(strings(&["api"]));
        assert_eq!(run(TREE, options), strings(&["src/a.py"]));
    }

    #[test]
    fn test_exclude_overrides_include() {
        let options = FilterOptions::default()
            .with_scope(Scope::All)
            .with_include_globs(strings(&["**/*.py"]))
            .with_exclude_globs(strings(&["**/*.py"]));
        assert!(run(TREE, options).is_empty());
    }

    #[test]
    fn test_include_cannot_widen_scope() {
        let options = FilterOptions::default()
            .with_scope(Scope::SrcOnly)
            .with_include_globs(strings(&["scripts/**", "src/a.py"]));
        assert_eq!(run(TREE, options), strings(&["src/a.py"]));
    }

    #[test]
    fn test_drop_readme_and_docs() {
        let options = FilterOptions::default()
            .with_scope(Scope::All)
            .with_drop(strings(&["README", "docs"]));
        let selected = run(TREE, options);
        assert!(!selected.contains(&"README.md".to_string()));
        assert!(!selected.contains(&"docs/guide.md".to_string()));
        assert!(selected.contains(&"scripts/deploy.sh".to_string()));
    }

    #[test]
    fn test_order_priority_and_tests_first() {
        let mut options = FilterOptions::default().with_scope(Scope::All);
        options.tests_first = true;
        let selected = run(
            &[
                "zeta.py",
                "Makefile",
                "tests/test_z.py",
                "README.md",
                "pyproject.toml",
                "Cargo.toml",
                "tests/test_a.py",
                "alpha.py",
            ],
            options,
        );
        assert_eq!(
            selected,
            strings(&[
                "pyproject.toml",
                "Makefile",
                "Cargo.toml",
                "README.md",
                "tests/test_a.py",
                "tests/test_z.py",
                "alpha.py",
                "zeta.py",
            ])
        );
    }

    #[test]
    fn test_order_is_input_independent() {
        let ctx = FilterContext::new(FilterOptions::default().with_scope(Scope::All)).unwrap();
        let mut reversed = strings(TREE);
        reversed.reverse();
        assert_eq!(select(&strings(TREE), &ctx), select(&reversed, &ctx));
    }
}
