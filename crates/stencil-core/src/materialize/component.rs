//! Component file materialization
//!
//! Each file rule of a component command is first turned into a
//! [`FilePlan`]: every destination path, the optional import path and the
//! ordered substitution list, computed without touching the filesystem.
//! The materializer then executes plans in catalog order.

use super::copy::copy_file;
use crate::case::convert_case;
use crate::error::Result;
use crate::paths::{extension_of, PathSegments};
use crate::substitution::Substitutions;
use crate::templates::{ComponentCommand, ComponentFile};
use crate::wiring::EntryPoint;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What every plan of one request shares
#[derive(Debug, Clone, Copy)]
pub struct GenerationContext<'a> {
    /// Project (module) name from the manifest
    pub project: &'a str,

    /// Root of the template sources
    pub template_dir: &'a Path,

    /// Module name the template sources import themselves by
    pub module_marker: &'a str,
}

/// Companion file copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortPlan {
    pub source: PathBuf,
    /// Relative to the project root
    pub destination: PathSegments,
}

/// Everything needed to materialize one component file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePlan {
    pub source: PathBuf,

    /// Relative to the project root
    pub destination: PathSegments,

    /// Import path to register in the entry point, if the rule asks for it
    pub import_path: Option<String>,

    pub port: Option<PortPlan>,

    pub substitutions: Substitutions,

    /// Component name handed to the next file rule of the same command
    pub next_name: String,
}

/// Compute the plan for `file` when generating `component_name`
pub fn plan_file(file: &ComponentFile, component_name: &str, ctx: &GenerationContext) -> FilePlan {
    let name = PathSegments::parse(component_name);
    let (nested, leaf) = name.split_leaf();
    let leaf = leaf.unwrap_or_default();
    let snake = convert_case(leaf, "snake_case");

    // The base folder comes back in through the caller's project root
    let declared = PathSegments::parse(&file.destination_dir);
    let base = PathSegments::new().push(declared.base().unwrap_or_default());
    let destination_dir = declared.strip_base();

    let declared_port = PathSegments::parse(&file.port.destination_dir);
    let port_dir = declared_port
        .strip_prefix(&base)
        .unwrap_or_else(|| declared_port.clone());

    let project = PathSegments::parse(ctx.project);
    let package_dir = base.join(&nested).join(&destination_dir);

    let import_path = file.ioc_discovery.then(|| {
        let mut import = project.join(&package_dir);
        if file.has_component_dir {
            import = import.push(&snake);
        }
        import.to_slash_string()
    });

    let file_name = format!(
        "{}{}{}",
        snake,
        file.append_at_end,
        extension_of(&file.source_file)
    );
    let mut destination = package_dir.clone();
    if file.has_component_dir {
        destination = destination.push(&snake);
    }
    let destination = destination.push(&file_name);

    let mut substitutions = Substitutions::new().with(
        format!("\"{}", ctx.module_marker),
        format!("\"{}", ctx.project),
    );
    if !file.port.destination_dir.is_empty() {
        substitutions.push(
            project.join(&base).join(&port_dir).to_slash_string(),
            project
                .join(&base)
                .join(&nested)
                .join(&port_dir)
                .to_slash_string(),
        );
    }
    for holder in &file.replace_holders {
        substitutions.push(
            holder.name.clone(),
            format!(
                "{}{}{}",
                holder.append_at_start,
                convert_case(leaf, &holder.kind),
                holder.append_at_end
            ),
        );
    }
    for literal in &file.literal_replacements {
        substitutions.push(literal.target.clone(), literal.replacement.clone());
    }

    let port = (!file.port.source_file.is_empty()).then(|| PortPlan {
        source: PathSegments::parse(&file.port.source_file).to_path(ctx.template_dir),
        destination: base.join(&nested).join(&port_dir).push(&format!(
            "{}{}",
            snake,
            extension_of(&file.port.source_file)
        )),
    });

    FilePlan {
        source: PathSegments::parse(&file.source_file).to_path(ctx.template_dir),
        destination,
        import_path,
        port,
        substitutions,
        next_name: nested.push(leaf).to_slash_string(),
    }
}

/// Executes component commands inside a project
pub struct ComponentMaterializer<'a> {
    ctx: GenerationContext<'a>,
    project_root: &'a Path,
    entry_point: &'a EntryPoint,
}

impl<'a> ComponentMaterializer<'a> {
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

    /// Materialize every file rule of `command` for `component_name`
    ///
    /// Stops at the first failure; files written before it stay on disk.
    pub async fn run(
        &self,
        command: &ComponentCommand,
        component_name: &str,
    ) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        let mut current = component_name.to_string();

        for file in &command.component_files {
            let plan = plan_file(file, &current, &self.ctx);
            debug!(
                source = %plan.source.display(),
                destination = %plan.destination,
                substitutions = %plan.substitutions,
                "planned component file"
            );
            written.extend(self.execute(&plan).await?);
            current = plan.next_name;
        }
        Ok(written)
    }

    /// Register, then copy the port and the primary file
    pub async fn execute(&self, plan: &FilePlan) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        if let Some(import_path) = &plan.import_path {
            self.entry_point.register(import_path).await?;
        }

        if let Some(port) = &plan.port {
            let destination = port.destination.to_path(self.project_root);
            copy_file(&port.source, &destination, &plan.substitutions).await?;
            report_copy(&port.source, &destination);
            written.push(destination);
        }

        let destination = plan.destination.to_path(self.project_root);
        copy_file(&plan.source, &destination, &plan.substitutions).await?;
        report_copy(&plan.source, &destination);
        written.push(destination);

        Ok(written)
    }
}

fn report_copy(source: &Path, destination: &Path) {
    println!(
        "{} from {} to {}.",
        "File copied successfully".green(),
        source.display(),
        destination.display()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EntryPointSettings;
    use crate::templates::{LiteralReplacement, PortFile, ReplaceHolder};
    use tempfile::TempDir;

    fn ctx(template_dir: &Path) -> GenerationContext<'_> {
        GenerationContext {
            project: "myproj",
            template_dir,
            module_marker: "archetype",
        }
    }

    fn rule(destination_dir: &str, has_component_dir: bool) -> ComponentFile {
        ComponentFile {
            source_file: "app/adapter/widget.go".to_string(),
            destination_dir: destination_dir.to_string(),
            has_component_dir,
            ..Default::default()
        }
    }

    #[test]
    fn test_nested_name_with_component_dir() {
        let plan = plan_file(&rule("app/adapter", true), "a/b/widget", &ctx(Path::new("/tpl")));
        assert_eq!(
            plan.destination.to_slash_string(),
            "app/a/b/adapter/widget/widget.go"
        );
        assert_eq!(plan.source, Path::new("/tpl/app/adapter/widget.go"));
        assert_eq!(plan.next_name, "a/b/widget");
    }

    #[test]
    fn test_flat_name_with_suffix_and_snake_case() {
        let mut file = rule("app/adapter/in/rest", false);
        file.append_at_end = "_controller".to_string();
        let plan = plan_file(&file, "GetUser", &ctx(Path::new("/tpl")));
        assert_eq!(
            plan.destination.to_slash_string(),
            "app/adapter/in/rest/get_user_controller.go"
        );
        assert_eq!(plan.import_path, None);
    }

    #[test]
    fn test_import_path_includes_component_dir() {
        let mut file = rule("app/adapter/in/rest", true);
        file.ioc_discovery = true;
        let plan = plan_file(&file, "users/GetUser", &ctx(Path::new("/tpl")));
        assert_eq!(
            plan.import_path.as_deref(),
            Some("myproj/app/users/adapter/in/rest/get_user")
        );

        file.has_component_dir = false;
        let plan = plan_file(&file, "GetUser", &ctx(Path::new("/tpl")));
        assert_eq!(plan.import_path.as_deref(), Some("myproj/app/adapter/in/rest"));
    }

    #[test]
    fn test_substitution_order() {
        let mut file = rule("app/usecase", false);
        file.port = PortFile {
            source_file: "app/domain/ports/in/port.go".to_string(),
            destination_dir: "app/domain/ports/in".to_string(),
        };
        file.replace_holders = vec![
            ReplaceHolder {
                name: "NewTemplate".to_string(),
                kind: "PascalCase".to_string(),
                append_at_start: "New".to_string(),
                append_at_end: "".to_string(),
            },
            ReplaceHolder {
                name: "template".to_string(),
                kind: "camelCase".to_string(),
                append_at_start: "".to_string(),
                append_at_end: "Handler".to_string(),
            },
        ];
        file.literal_replacements = vec![LiteralReplacement {
            target: "/api/template".to_string(),
            replacement: "/api/users".to_string(),
        }];

        let plan = plan_file(&file, "v1/get-user", &ctx(Path::new("/tpl")));
        let pairs: Vec<(&str, &str)> = plan
            .substitutions
            .pairs()
            .iter()
            .map(|(t, r)| (t.as_str(), r.as_str()))
            .collect();
        assert_eq!(
            pairs,
            [
                ("\"archetype", "\"myproj"),
                ("myproj/app/domain/ports/in", "myproj/app/v1/domain/ports/in"),
                ("NewTemplate", "NewGetUser"),
                ("template", "getUserHandler"),
                ("/api/template", "/api/users"),
            ]
        );

        let port = plan.port.unwrap();
        assert_eq!(port.source, Path::new("/tpl/app/domain/ports/in/port.go"));
        assert_eq!(
            port.destination.to_slash_string(),
            "app/v1/domain/ports/in/get_user.go"
        );
    }

    #[test]
    fn test_port_without_destination_adds_no_pair() {
        let plan = plan_file(&rule("app/usecase", false), "users", &ctx(Path::new("/tpl")));
        assert_eq!(plan.substitutions.len(), 1);
        assert!(plan.port.is_none());
    }

    #[tokio::test]
    async fn test_run_writes_port_then_file_and_registers() {
        let template = TempDir::new().unwrap();
        std::fs::create_dir_all(template.path().join("app/usecase")).unwrap();
        std::fs::create_dir_all(template.path().join("app/ports")).unwrap();
        std::fs::write(
            template.path().join("app/usecase/usecase.go"),
            "package usecase\n\nimport \"archetype/app/ports\"\n\ntype Template struct{}\n",
        )
        .unwrap();
        std::fs::write(
            template.path().join("app/ports/port.go"),
            "package ports\n\ntype Template interface{}\n",
        )
        .unwrap();

        let project = TempDir::new().unwrap();
        std::fs::write(
            project.path().join("main.go"),
            "package main\n\nimport (\n)\n\nfunc main() {}\n",
        )
        .unwrap();
        let entry_point = EntryPoint::new(project.path(), &EntryPointSettings::default());

        let command = ComponentCommand {
            kind: "usecase".to_string(),
            depends_on: vec![String::new()],
            component_files: vec![ComponentFile {
                source_file: "app/usecase/usecase.go".to_string(),
                destination_dir: "app/usecase".to_string(),
                has_component_dir: true,
                ioc_discovery: true,
                port: PortFile {
                    source_file: "app/ports/port.go".to_string(),
                    destination_dir: "app/ports".to_string(),
                },
                replace_holders: vec![ReplaceHolder {
                    name: "Template".to_string(),
                    kind: "PascalCase".to_string(),
                    ..Default::default()
                }],
                ..Default::default()
            }],
        };

        let materializer =
            ComponentMaterializer::new(ctx(template.path()), project.path(), &entry_point);
        let written = materializer.run(&command, "billing/create-invoice").await.unwrap();

        // The module marker pair runs first, so the port pair then sees the
        // rewritten import and nests it under the component's folders.

        let port = project.path().join("app/billing/ports/create_invoice.go");
        let primary = project
            .path()
            .join("app/billing/usecase/create_invoice/create_invoice.go");
        assert_eq!(written, vec![port.clone(), primary.clone()]);

        assert_eq!(
            std::fs::read_to_string(&port).unwrap(),
            "package ports\n\ntype CreateInvoice interface{}\n"
        );
        assert_eq!(
            std::fs::read_to_string(&primary).unwrap(),
            "package usecase\n\nimport \"myproj/app/billing/ports\"\n\ntype CreateInvoice struct{}\n"
        );

        let main_go = std::fs::read_to_string(project.path().join("main.go")).unwrap();
        assert!(main_go.contains("\t_ \"myproj/app/billing/usecase/create_invoice\"\n"));
    }

    #[tokio::test]
    async fn test_run_carries_nested_name_to_following_files() {
        let template = TempDir::new().unwrap();
        std::fs::create_dir_all(template.path().join("app/adapter/out")).unwrap();
        std::fs::create_dir_all(template.path().join("app/adapter/in")).unwrap();
        std::fs::write(template.path().join("app/adapter/out/repo.go"), "package out\n").unwrap();
        std::fs::write(template.path().join("app/adapter/in/handler.go"), "package in\n").unwrap();

        let project = TempDir::new().unwrap();
        std::fs::write(project.path().join("main.go"), "package main\n").unwrap();
        let entry_point = EntryPoint::new(project.path(), &EntryPointSettings::default());

        let command = ComponentCommand {
            kind: "crud".to_string(),
            depends_on: vec![],
            component_files: vec![
                ComponentFile {
                    source_file: "app/adapter/out/repo.go".to_string(),
                    destination_dir: "app/adapter/out".to_string(),
                    append_at_end: "_repository".to_string(),
                    ..Default::default()
                },
                ComponentFile {
                    source_file: "app/adapter/in/handler.go".to_string(),
                    destination_dir: "app/adapter/in".to_string(),
                    has_component_dir: true,
                    append_at_end: "_handler".to_string(),
                    ..Default::default()
                },
            ],
        };

        let materializer =
            ComponentMaterializer::new(ctx(template.path()), project.path(), &entry_point);
        let written = materializer.run(&command, "sales/Orders").await.unwrap();

        assert_eq!(
            written,
            vec![
                project.path().join("app/sales/adapter/out/orders_repository.go"),
                project.path().join("app/sales/adapter/in/orders/orders_handler.go"),
            ]
        );
        assert!(written.iter().all(|p| p.is_file()));
    }
}
