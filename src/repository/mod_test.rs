use super::*;
use crate::error::ErrorCode;

const SAMPLE: &str = r#"
configurations:
  - identifier: fast
    name: Fast drafts
    model: gpt-4o-mini
    maxTokens: 1024
  - identifier: default
    name: Default
    default: true
    model: gpt-4o
    temperature: 0.3
    systemPrompt: You are a careful copy editor.
    inputPricePerMtok: 2.5
    outputPricePerMtok: 10.0
  - "not a configuration"
  - identifier: retired
    name: Retired
    active: false
tasks:
  - uid: 1
    identifier: improve
    name: Improve writing
    description: Tighten wording
    prompt: "Improve: {{input}}"
  - uid: 2
    identifier: translate
    name: Translate
    prompt: Translate to German.
    configuration: fast
    active: false
  - uid: 3
    name: missing identifier
"#;

// =============================================================================
// from_yaml_str
// =============================================================================

#[test]
fn parses_configurations_in_order_and_skips_malformed() {
    let repos = Repositories::from_yaml_str(SAMPLE).unwrap();
    assert_eq!(repos.configurations.len(), 3);

    let active = repos.configurations.find_active();
    let ids: Vec<&str> = active.iter().map(|c| c.identifier.as_str()).collect();
    assert_eq!(ids, ["fast", "default"]);
    assert!(!active[0].is_default);
    assert!(active[1].is_default);
}

#[test]
fn configuration_fields_and_defaults() {
    let repos = Repositories::from_yaml_str(SAMPLE).unwrap();
    let fast = repos.configurations.find_one_by_identifier("fast").unwrap();
    assert_eq!(fast.model.as_deref(), Some("gpt-4o-mini"));
    assert_eq!(fast.max_tokens, 1024);
    assert!(fast.temperature.is_none());
    assert!(fast.is_active);

    let default = repos.configurations.find_default().unwrap();
    assert_eq!(default.identifier, "default");
    assert_eq!(default.max_tokens, crate::llm::types::DEFAULT_MAX_TOKENS);
    assert_eq!(default.input_price_per_mtok, Some(2.5));

    let opts = default.to_chat_options();
    assert_eq!(opts.model.as_deref(), Some("gpt-4o"));
    assert_eq!(opts.temperature, Some(0.3));
    assert_eq!(opts.system_prompt.as_deref(), Some("You are a careful copy editor."));
}

#[test]
fn inactive_configuration_is_invisible() {
    let repos = Repositories::from_yaml_str(SAMPLE).unwrap();
    assert!(repos.configurations.find_one_by_identifier("retired").is_none());
    assert!(repos.configurations.find_one_by_identifier("unknown").is_none());
}

#[test]
fn tasks_are_parsed_and_filtered() {
    let repos = Repositories::from_yaml_str(SAMPLE).unwrap();
    assert_eq!(repos.tasks.len(), 2);

    let improve = repos.tasks.find_by_uid(1).unwrap();
    assert_eq!(improve.identifier, "improve");
    assert_eq!(improve.prompt_template, "Improve: {{input}}");
    assert!(improve.configuration.is_none());

    assert!(repos.tasks.find_by_uid(2).is_none());
    assert!(repos.tasks.find_by_uid(3).is_none());
    assert_eq!(repos.tasks.find_active().len(), 1);
}

#[test]
fn empty_yaml_yields_empty_repositories() {
    let repos = Repositories::from_yaml_str("   \n").unwrap();
    assert!(repos.configurations.is_empty());
    assert!(repos.tasks.is_empty());
    assert!(repos.configurations.find_default().is_none());
}

#[test]
fn yaml_without_sections_yields_empty_repositories() {
    let repos = Repositories::from_yaml_str("other: 1\n").unwrap();
    assert!(repos.configurations.is_empty());
    assert!(repos.tasks.is_empty());
}

#[test]
fn malformed_yaml_errors() {
    let err = Repositories::from_yaml_str("configurations: [").unwrap_err();
    assert!(matches!(err, RepositoryError::Yaml(_)));
    assert_eq!(err.error_code(), "E_REPOSITORY_YAML");
}

// =============================================================================
// validation
// =============================================================================

#[test]
fn duplicate_identifier_errors() {
    let yaml = "configurations:\n  - {identifier: a, name: A}\n  - {identifier: ' a ', name: B}\n";
    let err = Repositories::from_yaml_str(yaml).unwrap_err();
    assert!(matches!(err, RepositoryError::DuplicateIdentifier(id) if id == "a"));
}

#[test]
fn empty_identifier_errors() {
    let yaml = "configurations:\n  - {identifier: '  ', name: A}\n";
    assert!(matches!(Repositories::from_yaml_str(yaml), Err(RepositoryError::EmptyIdentifier)));
}

#[test]
fn only_first_default_keeps_flag() {
    let yaml = "configurations:\n  - {identifier: a, name: A, default: true}\n  - {identifier: b, name: B, default: true}\n";
    let repos = Repositories::from_yaml_str(yaml).unwrap();
    let active = repos.configurations.find_active();
    assert!(active[0].is_default);
    assert!(!active[1].is_default);
    assert_eq!(repos.configurations.find_default().unwrap().identifier, "a");
}

#[test]
fn task_uid_validation() {
    let zero = "tasks:\n  - {uid: 0, identifier: a, name: A, prompt: p}\n";
    assert!(matches!(Repositories::from_yaml_str(zero), Err(RepositoryError::InvalidTaskUid)));

    let dup = "tasks:\n  - {uid: 4, identifier: a, name: A, prompt: p}\n  - {uid: 4, identifier: b, name: B, prompt: q}\n";
    assert!(matches!(Repositories::from_yaml_str(dup), Err(RepositoryError::DuplicateTaskUid(4))));
}

// =============================================================================
// load
// =============================================================================

#[test]
fn load_missing_file_is_empty() {
    let path = std::env::temp_dir().join("cowriter-definitely-missing-7f3a.yaml");
    let repos = Repositories::load(&path).unwrap();
    assert!(repos.configurations.is_empty());
    assert!(repos.tasks.is_empty());
}

#[test]
fn load_reads_file() {
    let path = std::env::temp_dir().join(format!("cowriter-load-test-{}.yaml", std::process::id()));
    std::fs::write(&path, SAMPLE).unwrap();
    let repos = Repositories::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(repos.configurations.len(), 3);
    assert_eq!(repos.tasks.len(), 2);
}
