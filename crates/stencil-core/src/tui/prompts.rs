//! Charm-style CLI prompts using cliclack

use crate::manifest::ProjectManifest;
use crate::product::ProductConfig;
use crate::scaffolder::Scaffolder;
use crate::templates::LoadedCatalog;
use anyhow::Result;
use std::path::PathBuf;

/// One CLI request; missing values are prompted for
#[derive(Debug, Clone)]
pub enum Request {
    Init {
        project: Option<String>,
        template_url: Option<String>,
        tag: Option<String>,
    },
    Generate {
        kind: Option<String>,
        name: Option<String>,
    },
    Install {
        command: Option<String>,
    },
}

/// Run one request against the project at `project_root`
pub async fn run<C: ProductConfig>(
    config: &C,
    project_root: PathBuf,
    request: Request,
) -> Result<()> {
    cliclack::intro(config.display_name())?;
    let scaffolder = Scaffolder::open(config, project_root)?;

    match request {
        Request::Init {
            project,
            template_url,
            tag,
        } => {
            let project = match project {
                Some(project) => project,
                None => cliclack::input("Project name")
                    .placeholder(".")
                    .default_input(".")
                    .interact()?,
            };
            let template_url = template_url.unwrap_or_else(|| config.template_url());

            let spinner = cliclack::spinner();
            spinner.start("Resolving template...");
            let manifest = match scaffolder.init(&project, &template_url, tag.as_deref()).await {
                Ok(manifest) => manifest,
                Err(e) => {
                    spinner.error("Initialization failed");
                    return Err(e.into());
                }
            };
            spinner.stop(format!("Template: {}", manifest.template));

            cliclack::outro(format!("Project {} initialized", manifest.project))?;
        }
        Request::Generate { kind, name } => {
            let kind = match kind {
                Some(kind) => kind,
                None => {
                    let (_, loaded) = scaffolder.catalog().await?;
                    select_component_kind(&loaded)?
                }
            };
            let name = match name {
                Some(name) => name,
                None => input_component_name(&kind)?,
            };

            let written = scaffolder.generate_component(&kind, &name).await?;
            cliclack::outro(format!("Generated {} '{}' ({} files)", kind, name, written.len()))?;
        }
        Request::Install { command } => {
            let command = match command {
                Some(command) => command,
                None => {
                    let (manifest, loaded) = scaffolder.catalog().await?;
                    select_installation(&manifest, &loaded)?
                }
            };

            let written = scaffolder.install_feature(&command).await?;
            cliclack::outro(format!("Installed {} ({} files)", command, written.len()))?;
        }
    }

    Ok(())
}

fn select_component_kind(loaded: &LoadedCatalog) -> Result<String> {
    let kinds = loaded.catalog.component_kinds();
    if kinds.is_empty() {
        anyhow::bail!("The template declares no components.");
    }

    let mut select = cliclack::select("Select a component");
    for kind in &kinds {
        select = select.item(kind.to_string(), *kind, "");
    }
    Ok(select.interact()?)
}

fn input_component_name(kind: &str) -> Result<String> {
    let name: String = cliclack::input(format!("Name of the {}", kind))
        .placeholder("orders or billing/invoice")
        .validate(|input: &String| {
            if input.trim().is_empty() {
                Err("Name cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact()?;
    Ok(name.trim().to_string())
}

fn select_installation(manifest: &ProjectManifest, loaded: &LoadedCatalog) -> Result<String> {
    let mut names: Vec<&str> = Vec::new();
    for command in &loaded.catalog.installation_commands {
        if !manifest.is_installed(&command.name) && !names.contains(&command.name.as_str()) {
            names.push(&command.name);
        }
    }

    if names.is_empty() {
        anyhow::bail!("Every feature of the template is already installed.");
    }

    let mut select = cliclack::select("Select a feature to install");
    for name in &names {
        let command = loaded
            .catalog
            .installation_commands_for(name)
            .into_iter()
            .next();
        let hint = command
            .map(|c| c.depends_on.iter().filter(|d| !d.is_empty()).cloned().collect::<Vec<_>>())
            .filter(|deps| !deps.is_empty())
            .map(|deps| format!("needs {}", deps.join(", ")))
            .unwrap_or_default();
        select = select.item(name.to_string(), *name, hint);
    }
    Ok(select.interact()?)
}
