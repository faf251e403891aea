use std::fs;
use std::path::Path;

use codesig_core::config::{Config, OutputFormat};
use codesig_core::types::Resolution;
use codesig_core::{Destination, Language, ResolveRequest, Workflow, WorkflowError};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, text: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn sample_project(root: &Path) {
    write(
        root,
        "Models/Customer.cs",
        "using System;\nnamespace Shop.Models\n{\n    public class Customer\n    {\n        public string Name;\n        public DateTime Joined;\n    }\n}\n",
    );
    write(
        root,
        "Services/CustomerService.cs",
        "using Shop.Models;\nnamespace Shop.Services\n{\n    public class CustomerService\n    {\n        public Customer Find(int id) { return null; }\n    }\n}\n",
    );
    write(root, "bin/Generated.cs", "namespace Shop.Generated { class Ignored { } }");
    write(root, "notes.txt", "not a source file");
}

#[tokio::test]
async fn test_run_writes_destinations() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("src");
    sample_project(&root);
    let out = temp.path().join("out");

    let request = ResolveRequest {
        sources: vec![root],
        destinations: vec![
            format!("{}=[Shop.Models]", out.join("models.json").display()).parse().unwrap(),
            Destination {
                path: out.join("all.json"),
                namespaces: Vec::new(),
            },
        ],
    };
    let outcome = Workflow::new(Config::default()).run(&request).await.unwrap();

    let ids: Vec<&str> = outcome.report.units.iter().map(|u| u.source_id.as_str()).collect();
    assert_eq!(ids, vec!["Models/Customer.cs", "Services/CustomerService.cs"]);
    assert!(outcome.report.failures.is_empty());
    assert_eq!(outcome.project.len(), 2);
    assert_eq!(outcome.project.missing.iter().collect::<Vec<_>>(), vec!["System"]);
    assert_eq!(outcome.written.len(), 2);

    let models: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("models.json")).unwrap()).unwrap();
    let files = models["files"].as_object().unwrap();
    assert_eq!(files.keys().collect::<Vec<_>>(), vec!["Shop.Models.Customer"]);

    let all: serde_json::Value = serde_json::from_str(&fs::read_to_string(out.join("all.json")).unwrap()).unwrap();
    let find = &all["files"]["Shop.Services.CustomerService"]["methods"][0];
    assert_eq!(find["name"], "Find");
    assert_eq!(find["return_type"]["full_name"], serde_json::json!(["Shop", "Models", "Customer"]));

    let service = outcome.project.get("Shop.Services.CustomerService").unwrap();
    assert_eq!(service.methods[0].return_type.resolution, Resolution::Project);
}

#[tokio::test]
async fn test_run_excludes_failed_files() {
    let temp = TempDir::new().unwrap();
    sample_project(temp.path());
    write(temp.path(), "Broken/Broken.cs", "namespace Shop.Broken { class Broken {");

    let request = ResolveRequest {
        sources: vec![temp.path().to_path_buf()],
        destinations: Vec::new(),
    };
    let outcome = Workflow::new(Config::default()).run(&request).await.unwrap();
    assert_eq!(outcome.report.failures.len(), 1);
    assert_eq!(outcome.report.failures[0].source_id, "Broken/Broken.cs");
    assert!(outcome.project.get("Shop.Broken.Broken").is_none());
    assert!(outcome.written.is_empty());

    let mut config = Config::default();
    config.workflow.fail_fast = true;
    let err = Workflow::new(config).run(&request).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Parse(_)));
}

#[tokio::test]
async fn test_run_yaml_output() {
    let temp = TempDir::new().unwrap();
    sample_project(temp.path());
    let out = temp.path().join("models.yaml");

    let mut config = Config::default();
    config.output.format = OutputFormat::Yaml;
    let request = ResolveRequest {
        sources: vec![temp.path().to_path_buf()],
        destinations: vec![format!("{}=[Shop.Services]", out.display()).parse().unwrap()],
    };
    Workflow::new(config).run(&request).await.unwrap();

    let text = fs::read_to_string(out).unwrap();
    assert!(text.starts_with("files:"));
    assert!(text.contains("Shop.Services.CustomerService"));
    assert!(!text.contains("Shop.Models.Customer:"));
}

#[tokio::test]
async fn test_run_mixed_languages() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "java/com/acme/Order.java",
        "package com.acme;\n\npublic class Order {\n    private Line line;\n}\n",
    );
    write(
        temp.path(),
        "java/com/acme/Line.java",
        "package com.acme;\n\npublic class Line {\n    private int quantity;\n}\n",
    );
    write(
        temp.path(),
        "web/cart.ts",
        "export class Cart {\n    total: number;\n}\n",
    );

    let request = ResolveRequest {
        sources: vec![temp.path().join("java"), temp.path().join("web")],
        destinations: Vec::new(),
    };
    let outcome = Workflow::new(Config::default()).run(&request).await.unwrap();
    assert_eq!(outcome.report.units.len(), 3);

    let order = outcome.project.get("com.acme.Order").unwrap();
    assert_eq!(order.fields[0].type_sig.full_name_string(), "com.acme.Line");
    let cart = outcome.project.get("Cart").unwrap();
    assert_eq!(cart.fields[0].type_sig.resolution, Resolution::Builtin);
}

#[test]
fn test_collect_sorts_across_roots() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "later/Beta.cs", "class Beta { }");
    write(temp.path(), "earlier/Alpha.cs", "class Alpha { }");
    write(temp.path(), "earlier/Gamma.cs", "class Gamma { }");

    let later = temp.path().join("later");
    let roots = vec![later.clone(), temp.path().join("earlier"), later];
    let files = Workflow::new(Config::default()).collect(&roots).unwrap();
    let ids: Vec<&str> = files.iter().map(|f| f.source_id.as_str()).collect();
    assert_eq!(ids, vec!["Alpha.cs", "Beta.cs", "Gamma.cs"]);
}

#[test]
fn test_stats_per_language_and_uncategorized() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "src/A.cs", "// A\nclass A\n{\n\n    int x;\n}\n");
    write(temp.path(), "src/B.java", "/**\n * B\n */\nclass B { }\n");
    write(temp.path(), "src/data.json", "{\n  \"a\": 1\n}\n");
    write(temp.path(), "bin/Skipped.cs", "class Skipped { }\n");

    let workflow = Workflow::new(Config::default());
    let stats = workflow.stats(&[temp.path().to_path_buf()], &["json".to_string()]).unwrap();

    let ids: Vec<&str> = stats.files.iter().map(|f| f.source_id.as_str()).collect();
    assert_eq!(ids, vec!["src/A.cs", "src/B.java", "src/data.json"]);

    let csharp = &stats.per_language[&Language::CSharp];
    assert_eq!(csharp.total_lines, 6);
    assert_eq!(csharp.blank_lines, 1);
    assert_eq!(csharp.comment_lines, 1);
    assert_eq!(stats.per_language[&Language::Java].comment_lines, 3);
    assert_eq!(stats.uncategorized.files, vec!["src/data.json"]);
    assert_eq!(stats.uncategorized.totals.total_lines, 3);

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["per_language"]["csharp"]["files"], 1);

    let without_json = workflow.stats(&[temp.path().to_path_buf()], &[]).unwrap();
    assert!(without_json.uncategorized.files.is_empty());
}
