//! Local include extraction and resolution.
//!
//! Only top-level `#include "..."` directives are considered. System includes
//! (`<...>`), includes of excluded libraries, and includes that do not name a
//! header in the inventory are treated as external and dropped.

use std::path::{Path, PathBuf};

use crate::builder::context::BuildContext;
use crate::core::inventory::{FileId, Inventory};
use crate::scan::comments::CommentStripper;
use crate::scan::{read_source, ScanError};
use crate::util::fs::normalize_lexically;

/// A parsed `#include` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeDirective {
    /// The text between the delimiters.
    pub target: String,
    /// Whether the directive used angle brackets.
    pub system: bool,
}

impl IncludeDirective {
    /// Parse a comment-free line as an include directive.
    ///
    /// Returns `None` for anything that is not an include, including
    /// computed includes (`#include MACRO`).
    pub fn parse(line: &str) -> Option<Self> {
        let rest = line.trim_start().strip_prefix('#')?;
        let rest = rest.trim_start().strip_prefix("include")?.trim_start();

        let (close, system) = match rest.chars().next()? {
            '"' => ('"', false),
            '<' => ('>', true),
            _ => return None,
        };

        let body = &rest[1..];
        let end = body.find(close)?;
        Some(IncludeDirective {
            target: body[..end].to_string(),
            system,
        })
    }
}

/// Extract include directives from file content, ignoring commented-out ones.
pub fn include_directives(content: &str) -> Vec<IncludeDirective> {
    CommentStripper::strip_all(content)
        .iter()
        .filter(|line| line.contains("include"))
        .filter_map(|line| IncludeDirective::parse(line))
        .collect()
}

/// Resolves a file's direct dependencies on project headers.
pub struct DependencyResolver<'a> {
    ctx: &'a BuildContext,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(ctx: &'a BuildContext) -> Self {
        DependencyResolver { ctx }
    }

    /// Whether an include target belongs to an excluded external library.
    fn is_excluded(&self, target: &str) -> bool {
        self.ctx
            .excluded_include_prefixes()
            .iter()
            .any(|prefix| target.starts_with(prefix.as_str()))
    }

    /// Candidate absolute paths for a quoted include, in lookup order: the
    /// including file's directory first, then the configured include dirs.
    fn candidates(&self, including: &Path, target: &str) -> Vec<PathBuf> {
        let base = including.parent().unwrap_or(Path::new(""));
        let mut paths = vec![normalize_lexically(&base.join(target))];
        for dir in self.ctx.include_dirs() {
            paths.push(normalize_lexically(&dir.join(target)));
        }
        paths
    }

    /// Direct header dependencies of `file`, given its content.
    ///
    /// The result is in include order, without duplicates, and never
    /// contains `file` itself.
    pub fn dependencies_in(&self, inv: &Inventory, file: FileId, content: &str) -> Vec<FileId> {
        let path = inv.get(file).path();
        let mut deps = Vec::new();

        for directive in include_directives(content) {
            if directive.system || self.is_excluded(&directive.target) {
                continue;
            }

            let resolved = self
                .candidates(path, &directive.target)
                .iter()
                .find_map(|candidate| inv.find_header(candidate));

            match resolved {
                Some(dep) if dep != file && !deps.contains(&dep) => {
                    tracing::trace!(
                        "{} -> {}",
                        path.display(),
                        inv.get(dep).path().display()
                    );
                    deps.push(dep);
                }
                Some(_) => {}
                None => tracing::trace!(
                    "{}: treating \"{}\" as external",
                    path.display(),
                    directive.target
                ),
            }
        }

        deps
    }

    /// Read `file` and compute its direct header dependencies.
    pub fn dependencies_of(&self, inv: &Inventory, file: FileId) -> Result<Vec<FileId>, ScanError> {
        let content = read_source(inv.get(file).path())?;
        Ok(self.dependencies_in(inv, file, &content))
    }

    /// Populate the dependency list of every file in the inventory.
    ///
    /// Any unreadable file aborts the whole pass: an incomplete graph could
    /// leave a stale object in place.
    pub fn resolve_all(&self, inv: &mut Inventory) -> Result<(), ScanError> {
        for id in inv.ids().collect::<Vec<_>>() {
            let deps = self.dependencies_of(inv, id)?;
            inv.get_mut(id).set_dependencies(deps);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::inventory::{FileKind, SourceFile};

    fn inventory(paths: &[&str]) -> Inventory {
        let files = paths
            .iter()
            .map(|p| {
                let kind = FileKind::from_path(Path::new(p)).unwrap();
                SourceFile::new(*p, kind, 0)
            })
            .collect();
        Inventory::from_files("/proj", files)
    }

    fn names(inv: &Inventory, deps: &[FileId]) -> Vec<String> {
        deps.iter()
            .map(|d| inv.get(*d).path().display().to_string())
            .collect()
    }

    #[test]
    fn test_parse_directive() {
        assert_eq!(
            IncludeDirective::parse("#include \"graphics.h\""),
            Some(IncludeDirective {
                target: "graphics.h".into(),
                system: false
            })
        );
        assert_eq!(
            IncludeDirective::parse("  #  include <stdio.h>"),
            Some(IncludeDirective {
                target: "stdio.h".into(),
                system: true
            })
        );
        assert_eq!(IncludeDirective::parse("#include CONFIG_HEADER"), None);
        assert_eq!(IncludeDirective::parse("#define include \"x.h\""), None);
        assert_eq!(IncludeDirective::parse("#include \"unterminated.h"), None);
    }

    #[test]
    fn test_commented_includes_are_ignored() {
        let content = "// #include \"foo.h\"\n/*\n#include \"bar.h\"\n*/\n#include \"baz.h\"\n";
        let targets: Vec<_> = include_directives(content)
            .into_iter()
            .map(|d| d.target)
            .collect();
        assert_eq!(targets, vec!["baz.h"]);
    }

    #[test]
    fn test_resolves_local_headers_only() {
        let inv = inventory(&["/proj/src/main.c", "/proj/src/graphics.h", "/proj/src/input.h"]);
        let ctx = BuildContext::for_root("/proj");
        let resolver = DependencyResolver::new(&ctx);

        let content = "#include <stdio.h>\n\
                       #include \"SDL2/SDL.h\"\n\
                       #include \"graphics.h\"\n\
                       #include \"missing.h\"\n\
                       #include \"input.h\"\n\
                       #include \"graphics.h\"\n";
        let main = inv.find(Path::new("/proj/src/main.c")).unwrap();
        let deps = resolver.dependencies_in(&inv, main, content);

        assert_eq!(
            names(&inv, &deps),
            vec!["/proj/src/graphics.h", "/proj/src/input.h"]
        );
    }

    #[test]
    fn test_resolves_parent_relative_includes() {
        let inv = inventory(&["/proj/entities/entity_00001.c", "/proj/src/frames.h"]);
        let ctx = BuildContext::for_root("/proj");
        let resolver = DependencyResolver::new(&ctx);

        let file = inv.find(Path::new("/proj/entities/entity_00001.c")).unwrap();
        let deps = resolver.dependencies_in(&inv, file, "#include \"../src/./frames.h\"\n");

        assert_eq!(names(&inv, &deps), vec!["/proj/src/frames.h"]);
    }

    #[test]
    fn test_falls_back_to_include_dirs() {
        let inv = inventory(&["/proj/src/main.c", "/proj/lib/cjson_wrapper.h"]);
        let ctx = BuildContext::for_root("/proj").with_include_dirs(vec![PathBuf::from("lib")]);
        let resolver = DependencyResolver::new(&ctx);

        let main = inv.find(Path::new("/proj/src/main.c")).unwrap();
        let deps = resolver.dependencies_in(&inv, main, "#include \"cjson_wrapper.h\"\n");

        assert_eq!(names(&inv, &deps), vec!["/proj/lib/cjson_wrapper.h"]);
    }

    #[test]
    fn test_self_include_is_dropped() {
        let inv = inventory(&["/proj/a.h"]);
        let ctx = BuildContext::for_root("/proj");
        let resolver = DependencyResolver::new(&ctx);

        let a = inv.find(Path::new("/proj/a.h")).unwrap();
        assert!(resolver.dependencies_in(&inv, a, "#include \"a.h\"\n").is_empty());
    }

    #[test]
    fn test_unreadable_file_is_an_error() {
        let inv = inventory(&["/definitely/not/here.c"]);
        let ctx = BuildContext::for_root("/definitely");
        let resolver = DependencyResolver::new(&ctx);

        let id = inv.ids().next().unwrap();
        assert!(matches!(
            resolver.dependencies_of(&inv, id),
            Err(ScanError::Read { .. })
        ));
    }
}
