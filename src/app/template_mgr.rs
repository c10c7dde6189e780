// DaocLog - app/template_mgr.rs
//
// Assembles the ordered template list a classifier runs with: the
// built-in grammars embedded in the binary, extended by user-defined
// TOML files on disk. User files can add grammars but never replace one.

use crate::core::model::LineTemplate;
use crate::core::template;
use crate::util::constants;
use crate::util::error::TemplateError;
use std::path::{Path, PathBuf};

/// Load the built-in templates, then append user templates from
/// `user_template_dir` in file-name order.
///
/// Extension is append-only. A user template whose id is already taken,
/// by a built-in or by an earlier user file, is ignored and reported as
/// `TemplateError::DuplicateId`. Every other problem with a user file is
/// reported the same way: the file is skipped and loading continues.
pub fn load_all_templates(
    user_template_dir: Option<&Path>,
) -> (Vec<LineTemplate>, Vec<TemplateError>) {
    let mut set = TemplateSet::default();
    for builtin in template::load_builtin_templates() {
        set.append(builtin, None);
    }

    match user_template_dir {
        Some(dir) if dir.is_dir() => {
            for (path, loaded) in read_user_templates(dir, &mut set.errors) {
                match loaded {
                    Ok(user) => set.append(user, Some(path)),
                    Err(e) => set.errors.push(e),
                }
            }
        }
        Some(dir) => {
            tracing::debug!(
                dir = %dir.display(),
                "User template directory does not exist (skipping)"
            );
        }
        None => {}
    }

    set.finish()
}

/// Templates accepted so far plus the non-fatal problems met on the way.
#[derive(Default)]
struct TemplateSet {
    templates: Vec<LineTemplate>,
    errors: Vec<TemplateError>,
    /// Templates refused because the set was already full.
    overflow: usize,
}

impl TemplateSet {
    /// `path` is the user file the template came from; `None` for built-ins.
    fn append(&mut self, candidate: LineTemplate, path: Option<PathBuf>) {
        if let Some(existing) = self.templates.iter().find(|t| t.id == candidate.id) {
            tracing::warn!(
                template_id = %candidate.id,
                existing_builtin = existing.is_builtin,
                "Template id already loaded; keeping the first"
            );
            self.errors.push(TemplateError::DuplicateId {
                id: candidate.id,
                path: path.unwrap_or_default(),
                existing_builtin: existing.is_builtin,
            });
            return;
        }

        if self.templates.len() >= constants::MAX_TEMPLATES {
            self.overflow += 1;
            return;
        }

        if let Some(path) = &path {
            tracing::info!(
                template_id = %candidate.id,
                name = %candidate.name,
                version = %candidate.version,
                file = %path.display(),
                "Loaded user-defined template"
            );
            tracing::debug!(
                template_id = %candidate.id,
                description = %candidate.description,
                "User template description"
            );
        }
        self.templates.push(candidate);
    }

    fn finish(mut self) -> (Vec<LineTemplate>, Vec<TemplateError>) {
        if self.overflow > 0 {
            let count = self.templates.len() + self.overflow;
            tracing::warn!(
                count,
                max = constants::MAX_TEMPLATES,
                "Too many templates, later ones ignored"
            );
            self.errors.push(TemplateError::TooManyTemplates {
                count,
                max: constants::MAX_TEMPLATES,
            });
        }

        tracing::debug!(
            total = self.templates.len(),
            builtin = self.templates.iter().filter(|t| t.is_builtin).count(),
            "Template loading complete"
        );
        (self.templates, self.errors)
    }
}

/// Compile every `.toml` file in `dir`, sorted by path so the order
/// templates are tried in does not depend on the filesystem.
///
/// A directory that cannot be listed is recorded in `errors` and yields
/// nothing.
fn read_user_templates(
    dir: &Path,
    errors: &mut Vec<TemplateError>,
) -> Vec<(PathBuf, Result<LineTemplate, TemplateError>)> {
    let listing = std::fs::read_dir(dir).and_then(|entries| {
        entries
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()
    });

    let mut paths = match listing {
        Ok(paths) => paths,
        Err(e) => {
            errors.push(TemplateError::Io {
                path: dir.to_path_buf(),
                source: e,
            });
            return Vec::new();
        }
    };
    paths.retain(|p| p.extension().is_some_and(|ext| ext == "toml"));
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let loaded = read_template_file(&path);
            (path, loaded)
        })
        .collect()
}

/// Read, size-check, parse and compile one user template file.
fn read_template_file(path: &Path) -> Result<LineTemplate, TemplateError> {
    let io_err = |source| TemplateError::Io {
        path: path.to_path_buf(),
        source,
    };

    let size = std::fs::metadata(path).map_err(io_err)?.len();
    if size > constants::MAX_TEMPLATE_FILE_SIZE {
        return Err(TemplateError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            max_size: constants::MAX_TEMPLATE_FILE_SIZE,
        });
    }

    let content = std::fs::read_to_string(path).map_err(io_err)?;
    let definition = template::parse_template_toml(&content, path)?;
    template::validate_and_compile(definition, path, false)
}
