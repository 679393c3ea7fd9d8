//! Installation materialization: folder and file copy rules

use super::component::GenerationContext;
use super::copy::{copy_dir, copy_file, first_level_dirs};
use crate::error::{Result, StencilError};
use crate::paths::{file_name_of, PathSegments};
use crate::substitution::Substitutions;
use crate::templates::InstallationCommand;
use crate::wiring::EntryPoint;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Placeholders applied to every installed file
pub fn default_substitutions(module_marker: &str, project: &str) -> Substitutions {
    Substitutions::new()
        .with(format!("\"{}", module_marker), format!("\"{}", project))
        .with("${project}", project)
}

/// Executes installation commands inside a project
pub struct FeatureMaterializer<'a> {
    ctx: GenerationContext<'a>,
    project_root: &'a Path,
    entry_point: &'a EntryPoint,
}

impl<'a> FeatureMaterializer<'a> {
    pub fn new(
        ctx: GenerationContext<'a>,
        project_root: &'a Path,
        entry_point: &'a EntryPoint,
    ) -> Self {
        Self {
            ctx,
            project_root,
            entry_point,
        }
    }

    fn import_path(&self, dir: &PathSegments) -> String {
        PathSegments::parse(self.ctx.project).join(dir).to_slash_string()
    }

    /// Copy the folders, then the files, of `command`
    pub async fn run(&self, command: &InstallationCommand) -> Result<Vec<PathBuf>> {
        let subs = default_substitutions(self.ctx.module_marker, self.ctx.project);
        let mut written = Vec::new();

        for folder in command.effective_folders() {
            let source_dir = PathSegments::parse(&folder.source_dir);
            let source = source_dir.to_path(self.ctx.template_dir);
            let destination =
                PathSegments::parse(&folder.destination_dir).to_path(self.project_root);

            written.extend(copy_dir(&source, &destination, &subs).await?);
            println!(
                "{} directory cloned successfully to {}.",
                command.name.green(),
                destination.display()
            );

            if !folder.ioc_discovery {
                continue;
            }

            // Folders register under their template-side path
            let import = self.import_path(&source_dir);
            self.entry_point.register(&import).await?;

            let children = first_level_dirs(&source)
                .map_err(|e| StencilError::file_copy(&source, &destination, e))?;
            for child in children {
                self.entry_point
                    .register(&format!("{}/{}", import, child))
                    .await?;
            }
        }

        for file in &command.files {
            let source = PathSegments::parse(&file.source_file).to_path(self.ctx.template_dir);
            let destination_dir = PathSegments::parse(&file.destination_dir);
            let destination = destination_dir
                .clone()
                .push(file_name_of(&file.source_file))
                .to_path(self.project_root);

            copy_file(&source, &destination, &subs).await?;
            println!(
                "{} directory cloned successfully to {}.",
                command.name.green(),
                destination.display()
            );
            written.push(destination);

            if file.ioc_discovery {
                self.entry_point
                    .register(&self.import_path(&destination_dir))
                    .await?;
            }
        }

        debug!(command = %command.name, files = written.len(), "installation materialized");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EntryPointSettings;
    use crate::templates::{InstallationFile, InstallationFolder};
    use tempfile::TempDir;

    fn template() -> TempDir {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("app/shared/infrastructure/postgres");
        std::fs::create_dir_all(base.join("migrations")).unwrap();
        std::fs::create_dir_all(base.join("repository")).unwrap();
        std::fs::write(
            base.join("connection.go"),
            "package postgres\n\nimport \"archetype/app/shared/config\"\n// ${project}\n",
        )
        .unwrap();
        std::fs::write(base.join("repository/base.go"), "package repository\n").unwrap();
        std::fs::create_dir_all(dir.path().join("app/shared/config")).unwrap();
        std::fs::write(
            dir.path().join("app/shared/config/postgres.go"),
            "package config\n",
        )
        .unwrap();
        dir
    }

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("main.go"),
            "package main\n\nimport (\n)\n\nfunc main() {}\n",
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_default_substitutions() {
        let subs = default_substitutions("archetype", "myproj");
        assert_eq!(
            subs.apply("import \"archetype/app\" // ${project}"),
            "import \"myproj/app\" // myproj"
        );
    }

    #[tokio::test]
    async fn test_folder_registration_includes_subdirectories() {
        let template = template();
        let project = project();
        let entry_point = EntryPoint::new(project.path(), &EntryPointSettings::default());
        let ctx = GenerationContext {
            project: "myproj",
            template_dir: template.path(),
            module_marker: "archetype",
        };

        let command = InstallationCommand {
            name: "postgres".to_string(),
            source_dir: "app/shared/infrastructure/postgres".to_string(),
            destination_dir: "app/shared/infrastructure/postgres".to_string(),
            files: vec![InstallationFile {
                source_file: "app/shared/config/postgres.go".to_string(),
                destination_dir: "app/shared/config".to_string(),
                ioc_discovery: true,
            }],
            ..Default::default()
        };

        let written = FeatureMaterializer::new(ctx, project.path(), &entry_point)
            .run(&command)
            .await
            .unwrap();
        assert_eq!(written.len(), 3);

        let connection = std::fs::read_to_string(
            project
                .path()
                .join("app/shared/infrastructure/postgres/connection.go"),
        )
        .unwrap();
        assert_eq!(
            connection,
            "package postgres\n\nimport \"myproj/app/shared/config\"\n// myproj\n"
        );
        assert!(project.path().join("app/shared/config/postgres.go").is_file());

        let main_go = std::fs::read_to_string(project.path().join("main.go")).unwrap();
        for import in [
            "myproj/app/shared/infrastructure/postgres",
            "myproj/app/shared/infrastructure/postgres/migrations",
            "myproj/app/shared/infrastructure/postgres/repository",
            "myproj/app/shared/config",
        ] {
            assert_eq!(
                main_go.matches(&format!("_ \"{}\"\n", import)).count(),
                1,
                "{} should be registered once",
                import
            );
        }
    }

    #[tokio::test]
    async fn test_folder_registers_its_source_path() {
        let template = TempDir::new().unwrap();
        std::fs::create_dir_all(template.path().join("tpl/pubsub/sub")).unwrap();
        std::fs::write(template.path().join("tpl/pubsub/client.go"), "package pubsub\n").unwrap();
        let project = project();
        let entry_point = EntryPoint::new(project.path(), &EntryPointSettings::default());
        let ctx = GenerationContext {
            project: "myproj",
            template_dir: template.path(),
            module_marker: "archetype",
        };

        let command = InstallationCommand {
            name: "pubsub".to_string(),
            folders: vec![InstallationFolder {
                source_dir: "tpl/pubsub".to_string(),
                destination_dir: "app/pubsub".to_string(),
                ioc_discovery: true,
            }],
            ..Default::default()
        };

        FeatureMaterializer::new(ctx, project.path(), &entry_point)
            .run(&command)
            .await
            .unwrap();
        assert!(project.path().join("app/pubsub/client.go").is_file());

        let main_go = std::fs::read_to_string(project.path().join("main.go")).unwrap();
        assert!(main_go.contains("\t_ \"myproj/tpl/pubsub\"\n"));
        assert!(main_go.contains("\t_ \"myproj/tpl/pubsub/sub\"\n"));
        assert!(!main_go.contains("myproj/app/pubsub"));
    }

    #[tokio::test]
    async fn test_folder_without_discovery_is_not_registered() {
        let template = template();
        let project = project();
        let entry_point = EntryPoint::new(project.path(), &EntryPointSettings::default());
        let ctx = GenerationContext {
            project: "myproj",
            template_dir: template.path(),
            module_marker: "archetype",
        };

        let command = InstallationCommand {
            name: "migrations".to_string(),
            folders: vec![InstallationFolder {
                source_dir: "app/shared/infrastructure/postgres/migrations".to_string(),
                destination_dir: "db/migrations".to_string(),
                ioc_discovery: false,
            }],
            ..Default::default()
        };

        FeatureMaterializer::new(ctx, project.path(), &entry_point)
            .run(&command)
            .await
            .unwrap();
        assert!(project.path().join("db/migrations").is_dir());
        let main_go = std::fs::read_to_string(project.path().join("main.go")).unwrap();
        assert!(!main_go.contains("_ \""));
    }
}
