//! Project loading
//!
//! Finds project descriptors under a build root and reads the identity,
//! references and output location out of each one. Descriptors are
//! MSBuild-style XML, scanned line by line rather than parsed.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::defaults::DEFAULT_OUTPUT_PATH;
use crate::core::project::{ensure_unique_identities, ProjectMetadata};
use crate::error::LoaderError;

const ASSEMBLY_NAME_TAG: &str = "<AssemblyName>";
const OUTPUT_PATH_TAG: &str = "<OutputPath>";
const OUTPUT_TYPE_TAG: &str = "<OutputType>";
/// Matched case-insensitively, so `<ProjectReference Include="` counts too
const REFERENCE_PREFIX: &str = "reference include=\"";

/// Load every project under `root`, in sorted walk order
pub fn load_projects(root: &Path, extension: &str) -> Result<Vec<ProjectMetadata>, LoaderError> {
    if !root.is_dir() {
        return Err(LoaderError::RootNotFound {
            path: root.to_path_buf(),
        });
    }

    let descriptors = find_descriptors(root, extension)?;
    if descriptors.is_empty() {
        return Err(LoaderError::NoDescriptorsFound {
            path: root.to_path_buf(),
            extension: extension.to_string(),
        });
    }
    tracing::info!(
        "Found {} project files under {}",
        descriptors.len(),
        root.display()
    );

    let projects = descriptors
        .iter()
        .map(|path| load_descriptor(path, extension))
        .collect::<Result<Vec<_>, _>>()?;
    ensure_unique_identities(&projects)?;
    Ok(projects)
}

/// Descriptor files under `root` whose extension matches, case-insensitively
pub fn find_descriptors(root: &Path, extension: &str) -> Result<Vec<PathBuf>, LoaderError> {
    let mut found = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| LoaderError::Walk {
            path: root.to_path_buf(),
            error: e.to_string(),
        })?;
        if entry.file_type().is_file() && has_extension(entry.path(), extension) {
            found.push(entry.into_path());
        }
    }
    Ok(found)
}

/// Read and parse one descriptor file
pub fn load_descriptor(path: &Path, extension: &str) -> Result<ProjectMetadata, LoaderError> {
    let content = std::fs::read_to_string(path).map_err(|e| LoaderError::Read {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;
    parse_descriptor(path, &content, extension)
}

/// Parse descriptor text
pub fn parse_descriptor(
    path: &Path,
    content: &str,
    extension: &str,
) -> Result<ProjectMetadata, LoaderError> {
    let identity = element_text(content, ASSEMBLY_NAME_TAG)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| LoaderError::MissingIdentity {
            path: path.to_path_buf(),
        })?;

    let mut project = ProjectMetadata::new(identity, &[]).with_descriptor(path);
    for line in content.lines() {
        if let Some(reference) = reference_name(line, extension) {
            project.add_dependency(&reference);
        }
    }

    let output_dir = element_text(content, OUTPUT_PATH_TAG)
        .map_or_else(|| DEFAULT_OUTPUT_PATH.to_string(), |p| p.replace('\\', "/"));
    let artifact_ext = match element_text(content, OUTPUT_TYPE_TAG).as_deref() {
        Some(kind) if kind.eq_ignore_ascii_case("exe") || kind.eq_ignore_ascii_case("winexe") => {
            "exe"
        }
        _ => "dll",
    };
    let output = project
        .descriptor_dir()
        .join(output_dir)
        .join(format!("{}.{artifact_ext}", project.identity));

    Ok(project.with_output(output))
}

/// Text between `tag` and the next `<` on the first line containing `tag`
fn element_text(content: &str, tag: &str) -> Option<String> {
    let line = content.lines().find(|line| line.contains(tag))?;
    let start = line.find(tag)? + tag.len();
    let rest = &line[start..];
    let end = rest.find('<').unwrap_or(rest.len());
    Some(rest[..end].trim().to_string())
}

/// Dependency name declared on a reference line, if any
fn reference_name(line: &str, extension: &str) -> Option<String> {
    let start = line.to_ascii_lowercase().find(REFERENCE_PREFIX)? + REFERENCE_PREFIX.len();
    let reference = line[start..].split([',', '"']).next()?.trim();
    if reference.is_empty() {
        return None;
    }

    // Windows separators are common in descriptors regardless of host
    let file_name = reference.rsplit(['/', '\\']).next().unwrap_or(reference);
    let name = match file_name.rsplit_once('.') {
        Some((stem, ext)) if ext.eq_ignore_ascii_case(extension) => stem,
        _ => file_name,
    };
    Some(name.to_string())
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const APP_PROJECT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Project ToolsVersion="4.0" xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
  <PropertyGroup>
    <OutputType>Exe</OutputType>
    <AssemblyName>App</AssemblyName>
  </PropertyGroup>
  <PropertyGroup>
    <OutputPath>bin\Release\</OutputPath>
  </PropertyGroup>
  <ItemGroup>
    <Reference Include="System" />
    <Reference Include="Newtonsoft.Json, Version=4.5.0.0, Culture=neutral">
      <HintPath>..\packages\Newtonsoft.Json.dll</HintPath>
    </Reference>
  </ItemGroup>
  <ItemGroup>
    <ProjectReference Include="..\Core\Core.csproj">
      <Name>Core</Name>
    </ProjectReference>
    <ProjectReference Include="../Util/Util.CSPROJ" />
  </ItemGroup>
</Project>
"#;

    #[test]
    fn test_parse_identity_and_references() {
        let project = parse_descriptor(Path::new("src/App/App.csproj"), APP_PROJECT, "csproj").unwrap();
        assert_eq!(project.identity, "App");
        assert_eq!(
            project.dependencies,
            vec!["System", "Newtonsoft.Json", "Core", "Util"]
        );
    }

    #[test]
    fn test_output_location() {
        let project = parse_descriptor(Path::new("src/App/App.csproj"), APP_PROJECT, "csproj").unwrap();
        assert_eq!(
            project.output,
            Some(PathBuf::from("src/App/bin/Release/App.exe"))
        );
    }

    #[test]
    fn test_library_defaults_to_debug_dll() {
        let content = "<Project>\n<AssemblyName>Core</AssemblyName>\n</Project>\n";
        let project = parse_descriptor(Path::new("Core/Core.csproj"), content, "csproj").unwrap();
        assert_eq!(project.output, Some(PathBuf::from("Core/bin/Debug/Core.dll")));
        assert!(project.dependencies.is_empty());
    }

    #[test]
    fn test_missing_assembly_name() {
        let result = parse_descriptor(Path::new("x.csproj"), "<Project></Project>", "csproj");
        assert!(matches!(result, Err(LoaderError::MissingIdentity { .. })));

        let empty = parse_descriptor(
            Path::new("x.csproj"),
            "<AssemblyName></AssemblyName>",
            "csproj",
        );
        assert!(matches!(empty, Err(LoaderError::MissingIdentity { .. })));
    }

    #[test]
    fn test_reference_name_rules() {
        assert_eq!(
            reference_name(r#"<Reference Include="System.Xml" />"#, "csproj"),
            Some("System.Xml".to_string())
        );
        assert_eq!(
            reference_name(r#"<reference include="..\lib\Foo.dll" />"#, "csproj"),
            Some("Foo.dll".to_string())
        );
        assert_eq!(
            reference_name(r#"<ProjectReference Include="a\b\Lib.vbproj" />"#, "vbproj"),
            Some("Lib".to_string())
        );
        assert_eq!(reference_name("<Compile Include=\"Foo.cs\" />", "csproj"), None);
    }

    #[test]
    fn test_load_projects_sorted_and_validated() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        for (dir, name) in [("b", "Beta"), ("a", "Alpha")] {
            std::fs::create_dir_all(root.join(dir)).unwrap();
            std::fs::write(
                root.join(dir).join(format!("{name}.csproj")),
                format!("<AssemblyName>{name}</AssemblyName>\n"),
            )
            .unwrap();
        }
        std::fs::write(root.join("notes.txt"), "<AssemblyName>Nope</AssemblyName>").unwrap();

        let projects = load_projects(root, "csproj").unwrap();
        let names: Vec<_> = projects.iter().map(|p| p.identity.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_load_projects_empty_root() {
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(
            load_projects(temp_dir.path(), "csproj"),
            Err(LoaderError::NoDescriptorsFound { .. })
        ));
    }

    #[test]
    fn test_load_projects_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(
            load_projects(&temp_dir.path().join("absent"), "csproj"),
            Err(LoaderError::RootNotFound { .. })
        ));
    }

    #[test]
    fn test_load_projects_duplicate_identity() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::write(root.join("One.csproj"), "<AssemblyName>Same</AssemblyName>").unwrap();
        std::fs::write(root.join("Two.csproj"), "<AssemblyName>Same</AssemblyName>").unwrap();

        assert!(matches!(
            load_projects(root, "csproj"),
            Err(LoaderError::DuplicateIdentity { .. })
        ));
    }
}
