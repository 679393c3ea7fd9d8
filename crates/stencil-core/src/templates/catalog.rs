//! Template catalog types and parsing
//!
//! The catalog is the template's own JSON declaration of installation and
//! component-generation rules. All fields are optional on the wire so that
//! older catalogs keep parsing.

use serde::{Deserialize, Serialize};

/// Literal `target` -> `replacement` pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiteralReplacement {
    pub target: String,
    pub replacement: String,
}

/// Placeholder replaced with the component name in a given case
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReplaceHolder {
    /// Text to look for in the template file
    pub name: String,

    /// Name case applied to the component name (e.g. `PascalCase`)
    pub kind: String,

    pub append_at_start: String,
    pub append_at_end: String,
}

/// Companion ("port") file generated alongside a component file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PortFile {
    pub source_file: String,
    pub destination_dir: String,
}

/// One file produced by a component command
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComponentFile {
    pub source_file: String,

    /// Destination directory; its first segment is the project base folder
    pub destination_dir: String,

    /// Suffix appended to the generated file name, before the extension
    pub append_at_end: String,

    /// Whether the component gets its own directory
    pub has_component_dir: bool,

    /// Whether the generated package is registered in the entry point
    pub ioc_discovery: bool,

    pub port: PortFile,

    pub replace_holders: Vec<ReplaceHolder>,

    pub literal_replacements: Vec<LiteralReplacement>,
}

/// Rule generating components of one kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComponentCommand {
    pub kind: String,
    pub depends_on: Vec<String>,
    pub component_files: Vec<ComponentFile>,
}

/// Folder copied recursively by an installation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InstallationFolder {
    pub source_dir: String,
    pub destination_dir: String,
    pub ioc_discovery: bool,
}

/// Single file copied by an installation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InstallationFile {
    pub source_file: String,
    pub destination_dir: String,
    pub ioc_discovery: bool,
}

/// Rule installing a cross-cutting feature
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InstallationCommand {
    pub name: String,
    pub unique: String,
    pub depends_on: Vec<String>,
    pub source_dir: String,
    pub destination_dir: String,
    pub folders: Vec<InstallationFolder>,
    pub files: Vec<InstallationFile>,
    pub libraries: Vec<String>,
}

impl InstallationCommand {
    /// Declared folders plus the command-level `sourceDir`/`destinationDir`
    /// pair, which always takes part in entry-point discovery
    pub fn effective_folders(&self) -> Vec<InstallationFolder> {
        let mut folders = self.folders.clone();
        if !self.source_dir.is_empty() && !self.destination_dir.is_empty() {
            folders.push(InstallationFolder {
                source_dir: self.source_dir.clone(),
                destination_dir: self.destination_dir.clone(),
                ioc_discovery: true,
            });
        }
        folders
    }
}

/// Anything carrying a `dependsOn` list
pub trait Dependent {
    fn depends_on(&self) -> &[String];
}

impl Dependent for ComponentCommand {
    fn depends_on(&self) -> &[String] {
        &self.depends_on
    }
}

impl Dependent for InstallationCommand {
    fn depends_on(&self) -> &[String] {
        &self.depends_on
    }
}

/// Parsed template catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Catalog {
    /// Module name used in the template sources; read from the template's
    /// module file when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,

    pub installation_commands: Vec<InstallationCommand>,

    pub component_commands: Vec<ComponentCommand>,
}

impl Catalog {
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Component rules for `kind`, in catalog order
    pub fn component_commands_for(&self, kind: &str) -> Vec<&ComponentCommand> {
        self.component_commands
            .iter()
            .filter(|c| c.kind == kind)
            .collect()
    }

    /// Installation rules named `name`, in catalog order
    pub fn installation_commands_for(&self, name: &str) -> Vec<&InstallationCommand> {
        self.installation_commands
            .iter()
            .filter(|c| c.name == name)
            .collect()
    }

    /// Distinct component kinds, first-seen order
    pub fn component_kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = Vec::new();
        for command in &self.component_commands {
            if !kinds.contains(&command.kind.as_str()) {
                kinds.push(&command.kind);
            }
        }
        kinds
    }
}
