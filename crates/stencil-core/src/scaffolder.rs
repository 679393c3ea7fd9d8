//! Request workflows: init, component generation, feature installation
//!
//! `Scaffolder` owns the manifest repository and the catalog loader for one
//! project directory. Each request loads the manifest, resolves a rule from
//! the catalog, materializes files and records the result in the manifest
//! as its last step. A failure half-way through a multi-file command leaves
//! the files already written on disk and the manifest unchanged.

use crate::case::convert_case;
use crate::config::Settings;
use crate::error::{Result, StencilError};
use crate::manifest::{FileManifestStore, ManifestRepository, ProjectManifest, TemplateRef};
use crate::materialize::{ComponentMaterializer, FeatureMaterializer, GenerationContext};
use crate::packages;
use crate::product::ProductConfig;
use crate::resolver::{DependencyPolicy, Resolver};
use crate::templates::{CatalogLoader, LoadedCatalog, TemplateFetcher};
use crate::wiring::EntryPoint;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Generation engine bound to one project directory
pub struct Scaffolder<R: ManifestRepository = FileManifestStore> {
    project_root: PathBuf,
    settings: Settings,
    repository: R,
    loader: CatalogLoader,
    product_name: String,
}

impl Scaffolder<FileManifestStore> {
    /// Open the project at `project_root` with the product's file names
    pub fn open<C: ProductConfig>(config: &C, project_root: impl Into<PathBuf>) -> Result<Self> {
        let project_root = project_root.into();
        let settings = Settings::load(&project_root)?;
        let repository = FileManifestStore::in_project(&project_root, config.manifest_file());
        let loader = CatalogLoader::new(
            TemplateFetcher::from_config(config, &settings),
            config.catalog_file(),
            settings.module_file.clone(),
        );
        Ok(Self::new(project_root, settings, repository, loader, config.name()))
    }
}

impl<R: ManifestRepository> Scaffolder<R> {
    pub fn new(
        project_root: PathBuf,
        settings: Settings,
        repository: R,
        loader: CatalogLoader,
        product_name: impl Into<String>,
    ) -> Self {
        Self {
            project_root,
            settings,
            repository,
            loader,
            product_name: product_name.into(),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Bind the project to a template and write a fresh manifest
    ///
    /// Without an explicit tag the latest semver tag of the template is used.
    pub async fn init(
        &self,
        project: &str,
        template_url: &str,
        tag: Option<&str>,
    ) -> Result<ProjectManifest> {
        if self.repository.exists() {
            return Err(StencilError::AlreadyInitialized {
                path: self.project_root.clone(),
            });
        }

        let tag = match tag {
            Some(tag) => tag.to_string(),
            None => self
                .loader
                .fetcher()
                .latest_tag(template_url)
                .await
                .map_err(|e| StencilError::CatalogUnavailable {
                    reference: template_url.to_string(),
                    reason: format!("{:#}", e),
                })?,
        };
        let reference = TemplateRef::new(template_url, tag);

        // Fail now rather than on the first generate request
        self.loader.load(&reference).await?;

        let manifest = ProjectManifest::new(self.project_name(project), reference);
        self.repository.save(&manifest)?;
        info!(project = %manifest.project, template = %manifest.template, "project initialized");
        Ok(manifest)
    }

    /// `.` means the name of the project directory
    fn project_name(&self, requested: &str) -> String {
        let raw = if requested == "." {
            std::fs::canonicalize(&self.project_root)
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
                .unwrap_or_else(|| requested.to_string())
        } else {
            requested.to_string()
        };
        convert_case(&raw, "kebab")
    }

    /// Manifest and catalog of the project, for listing choices
    pub async fn catalog(&self) -> Result<(ProjectManifest, LoadedCatalog)> {
        let manifest = self.repository.load()?;
        let loaded = self.loader.load(&manifest.template).await?;
        Ok((manifest, loaded))
    }

    fn entry_point(&self) -> EntryPoint {
        EntryPoint::new(&self.project_root, &self.settings.entry_point)
    }

    /// Generate component `name` of `kind`
    ///
    /// Returns the files written.
    pub async fn generate_component(&self, kind: &str, name: &str) -> Result<Vec<PathBuf>> {
        let manifest = self.repository.load()?;
        manifest.ensure_component_absent(kind, name)?;

        let loaded = self.loader.load(&manifest.template).await?;
        let resolver = Resolver::new(&loaded.catalog, &manifest.installations);
        let command = resolver
            .select_component(kind)
            .inspect_err(|e| self.report_missing(e))?;

        let ctx = GenerationContext {
            project: &manifest.project,
            template_dir: &loaded.template_dir,
            module_marker: &loaded.module_marker,
        };
        let entry_point = self.entry_point();
        let written = ComponentMaterializer::new(ctx, &self.project_root, &entry_point)
            .run(command, name)
            .await?;

        self.repository.append_component(kind, name)?;
        info!(kind, name, files = written.len(), "component generated");
        Ok(written)
    }

    /// Install the feature declared by installation command `command_name`
    ///
    /// Returns the files written.
    pub async fn install_feature(&self, command_name: &str) -> Result<Vec<PathBuf>> {
        let manifest = self.repository.load()?;
        let loaded = self.loader.load(&manifest.template).await?;
        let resolver = Resolver::new(&loaded.catalog, &manifest.installations);

        let command = resolver.select_installation(command_name)?;
        manifest.ensure_unique_free(&command.unique)?;
        resolver
            .gate(command, command_name, DependencyPolicy::AllSatisfied)
            .inspect_err(|e| self.report_missing(e))?;

        let ctx = GenerationContext {
            project: &manifest.project,
            template_dir: &loaded.template_dir,
            module_marker: &loaded.module_marker,
        };
        let entry_point = self.entry_point();
        let written = FeatureMaterializer::new(ctx, &self.project_root, &entry_point)
            .run(command)
            .await?;

        self.repository
            .append_installation(&command.name, &command.libraries, &command.unique)?;
        info!(command = command_name, files = written.len(), "feature installed");

        packages::run_fetch(&self.settings.fetch_command, &self.project_root).await?;
        Ok(written)
    }

    /// Print install suggestions for a dependency failure
    fn report_missing(&self, err: &StencilError) {
        let StencilError::DependenciesMissing { missing, .. } = err else {
            return;
        };
        println!(
            "{}",
            "Some dependencies are missing. Please install the following dependencies:".yellow()
        );
        for dependency in missing {
            println!("{} install {}", self.product_name, dependency);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::testing::TestProduct;
    use tempfile::TempDir;

    const CATALOG: &str = r#"{
        "moduleName": "archetype",
        "installationCommands": [
            {"name": "echo", "unique": "server", "dependsOn": [], "libraries": ["github.com/labstack/echo/v4"]},
            {"name": "gin", "unique": "server", "dependsOn": []},
            {"name": "gorm", "dependsOn": ["postgres", "echo"]}
        ],
        "componentCommands": [
            {
                "kind": "controller",
                "dependsOn": ["echo"],
                "componentFiles": [
                    {"sourceFile": "app/rest/controller.go", "destinationDir": "app/rest", "hasComponentDir": true, "iocDiscovery": true}
                ]
            },
            {
                "kind": "endpoint",
                "dependsOn": ["echo"],
                "componentFiles": [
                    {"sourceFile": "app/rest/controller.go", "destinationDir": "app/rest"},
                    {"sourceFile": "app/rest/missing.go", "destinationDir": "app/rest/routes"}
                ]
            }
        ]
    }"#;

    struct Fixture {
        template: TempDir,
        project: TempDir,
        _cache: TempDir,
        scaffolder: Scaffolder,
    }

    fn fixture() -> Fixture {
        let template = TempDir::new().unwrap();
        std::fs::write(template.path().join(".stencil.template.json"), CATALOG).unwrap();
        std::fs::create_dir_all(template.path().join("app/rest")).unwrap();
        std::fs::write(
            template.path().join("app/rest/controller.go"),
            "package rest\n",
        )
        .unwrap();

        let project = TempDir::new().unwrap();
        std::fs::write(project.path().join("main.go"), "package main\n\nimport (\n)\n").unwrap();
        std::fs::write(project.path().join("stencil.yaml"), "fetch_command: []\n").unwrap();

        let cache = TempDir::new().unwrap();
        let settings = Settings::load(project.path()).unwrap();
        let loader = CatalogLoader::new(
            TemplateFetcher::new(cache.path(), "test"),
            ".stencil.template.json",
            "go.mod",
        );
        let scaffolder = Scaffolder::new(
            project.path().to_path_buf(),
            settings,
            FileManifestStore::in_project(project.path(), ".stencil.json"),
            loader,
            "stencil",
        );

        Fixture {
            template,
            project,
            _cache: cache,
            scaffolder,
        }
    }

    async fn initialized() -> Fixture {
        let fx = fixture();
        let url = fx.template.path().to_string_lossy().to_string();
        fx.scaffolder.init("MyProj", &url, Some("")).await.unwrap();
        fx
    }

    #[tokio::test]
    async fn test_init_writes_kebab_case_manifest() {
        let fx = initialized().await;
        let manifest = fx.scaffolder.repository().load().unwrap();
        assert_eq!(manifest.project, "my-proj");
        assert!(manifest.components.is_empty());
        assert!(manifest.template.tag.is_empty());
    }

    #[tokio::test]
    async fn test_init_twice_is_rejected() {
        let fx = initialized().await;
        let url = fx.template.path().to_string_lossy().to_string();
        let err = fx.scaffolder.init("other", &url, None).await.unwrap_err();
        assert!(matches!(err, StencilError::AlreadyInitialized { .. }));
    }

    #[tokio::test]
    async fn test_generate_requires_manifest() {
        let fx = fixture();
        let err = fx
            .scaffolder
            .generate_component("controller", "users")
            .await
            .unwrap_err();
        assert!(matches!(err, StencilError::ManifestMissing { .. }));
    }

    #[tokio::test]
    async fn test_generate_without_dependency_fails_before_writing() {
        let fx = initialized().await;
        let err = fx
            .scaffolder
            .generate_component("controller", "users")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StencilError::DependenciesMissing { ref missing, .. } if missing == &["echo"]
        ));
        assert!(!fx.project.path().join("app").exists());
        assert!(fx.scaffolder.repository().load().unwrap().components.is_empty());
    }

    #[tokio::test]
    async fn test_install_then_generate() {
        let fx = initialized().await;
        fx.scaffolder.install_feature("echo").await.unwrap();
        let written = fx
            .scaffolder
            .generate_component("controller", "users")
            .await
            .unwrap();
        assert_eq!(
            written,
            vec![fx.project.path().join("app/rest/users/users.go")]
        );

        let manifest = fx.scaffolder.repository().load().unwrap();
        assert!(manifest.has_component("controller", "users"));
        assert_eq!(manifest.installations[0].unique, "server");
        assert_eq!(
            manifest.installations[0].libraries,
            vec!["github.com/labstack/echo/v4"]
        );

        let main_go = std::fs::read_to_string(fx.project.path().join("main.go")).unwrap();
        assert!(main_go.contains("_ \"my-proj/app/rest/users\""));
    }

    #[tokio::test]
    async fn test_generate_existing_component_writes_nothing() {
        let fx = initialized().await;
        fx.scaffolder.install_feature("echo").await.unwrap();
        fx.scaffolder
            .generate_component("controller", "users")
            .await
            .unwrap();

        let generated = fx.project.path().join("app/rest/users/users.go");
        std::fs::write(&generated, "// edited by hand\n").unwrap();

        let err = fx
            .scaffolder
            .generate_component("controller", "users")
            .await
            .unwrap_err();
        assert!(matches!(err, StencilError::ComponentExists { .. }));
        assert_eq!(
            std::fs::read_to_string(&generated).unwrap(),
            "// edited by hand\n"
        );
    }

    #[tokio::test]
    async fn test_failed_file_keeps_earlier_files_and_skips_manifest() {
        let fx = initialized().await;
        fx.scaffolder.install_feature("echo").await.unwrap();

        let err = fx
            .scaffolder
            .generate_component("endpoint", "orders")
            .await
            .unwrap_err();
        assert!(matches!(err, StencilError::FileCopy { .. }));

        assert!(fx.project.path().join("app/rest/orders.go").is_file());
        assert!(!fx.project.path().join("app/rest/routes").exists());
        assert!(fx.scaffolder.repository().load().unwrap().components.is_empty());
    }

    #[tokio::test]
    async fn test_install_unique_collision() {
        let fx = initialized().await;
        fx.scaffolder.install_feature("echo").await.unwrap();
        let err = fx.scaffolder.install_feature("gin").await.unwrap_err();
        assert!(matches!(err, StencilError::InstallationExists { ref unique } if unique == "server"));
    }

    #[tokio::test]
    async fn test_install_lists_only_missing_dependencies() {
        let fx = initialized().await;
        fx.scaffolder.install_feature("echo").await.unwrap();
        let err = fx.scaffolder.install_feature("gorm").await.unwrap_err();
        assert!(matches!(
            err,
            StencilError::DependenciesMissing { ref missing, .. } if missing == &["postgres"]
        ));
    }

    #[tokio::test]
    async fn test_unknown_rules() {
        let fx = initialized().await;
        assert!(matches!(
            fx.scaffolder.install_feature("kafka").await.unwrap_err(),
            StencilError::RuleNotFound { .. }
        ));
        assert!(matches!(
            fx.scaffolder.generate_component("worker", "jobs").await.unwrap_err(),
            StencilError::RuleNotFound { .. }
        ));
    }

    #[test]
    fn test_open_reads_settings() {
        let project = TempDir::new().unwrap();
        std::fs::write(
            project.path().join("stencil.yaml"),
            "entry_point:\n  file: cmd/main.go\n",
        )
        .unwrap();
        let scaffolder = Scaffolder::open(&TestProduct, project.path()).unwrap();
        assert_eq!(
            scaffolder.entry_point().path(),
            project.path().join("cmd/main.go")
        );
        assert_eq!(
            scaffolder.repository().path(),
            project.path().join(".stencil.json")
        );
    }
}
