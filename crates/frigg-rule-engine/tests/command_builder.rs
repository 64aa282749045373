//! End-to-end rendering of rule files against parameter tables

use frigg_core::{Param, ParamTable};
use frigg_rule_engine::{build, CommandBuilder, RuleError};

const ADLA_RULES: &str = r#"{
    "Template": "UsqlScript ScriptName=(ScriptName:default,Idf.usql) AnalyticsAccountName=matrixadlaprod @@PARAMS@@",
    "Rules": [
        {"TypePattern": "string", "NamePattern": "(Input)([^@]*)", "Format": "PATHIN_${name[2]}={in:EncryptedAzureBlobPath:${name[2]}}"},
        {"TypePattern": "string", "NamePattern": "(Output)([^@]*)", "Format": "OutputReferenceEncrypted_${name[2]}={out:AzureBlobPath:${name[2]}}"},
        {"TypePattern": "int", "NamePattern": "(.*)", "Format": "PARAM_${name[1]}=[(${name[1]}:int,,${value !== '' ? ':default,' + value : ''})]"},
        {"TypePattern": "", "NamePattern": "(.*)", "Format": "PARAM_${name[1]}=\"[(${name[1]})]\""}
    ]
}"#;

fn table(params: &[(&str, &str, &str)]) -> ParamTable {
    params
        .iter()
        .map(|(name, value, param_type)| {
            (format!("@@{}@@", name), Param::new(*name, *value, *param_type))
        })
        .collect()
}

#[test]
fn test_more_specific_rule_wins() {
    let rules = r#"{"Template": "@@PARAMS@@", "Rules": [
        {"TypePattern": "", "NamePattern": "(.*)", "Format": "GENERIC_${name[1]}"},
        {"TypePattern": "int", "NamePattern": "(.*)", "Format": "INT_${name[1]}"}
    ]}"#;

    let output = build(rules, &table(&[("Count", "5", "int")])).unwrap();
    assert!(output.contains("INT_Count"));
    assert!(!output.contains("GENERIC_"));
}

#[test]
fn test_unmatched_parameter_is_dropped() {
    let rules = r#"{"Template": "run @@PARAMS@@", "Rules": [
        {"TypePattern": "int", "NamePattern": "", "Format": "x"}
    ]}"#;

    let output = build(rules, &table(&[("Name", "", "string")])).unwrap();
    assert_eq!(output, "run ");
}

#[test]
fn test_scaffold_renders_empty_template() {
    let params = table(&[("A", "1", "int"), ("B", "", "")]);
    assert_eq!(build(r#"{"Template": "", "Rules": []}"#, &params).unwrap(), "");
}

#[test]
fn test_fallback_only_configuration_renders_nothing() {
    // A rule with no patterns scores zero and is never selected.
    let rules = r#"{"Template": "[@@PARAMS@@]", "Rules": [
        {"TypePattern": "", "NamePattern": "", "Format": "${value}"}
    ]}"#;

    let output = build(rules, &table(&[("A", "1", ""), ("B", "2", "int")])).unwrap();
    assert_eq!(output, "[]");
}

#[test]
fn test_full_rule_file() {
    let params = table(&[
        ("Input1", "", "string"),
        ("Count", "5", "int"),
        ("Output", "", "string"),
        ("Limit", "", "int"),
        ("Label", "x", ""),
    ]);

    let output = build(ADLA_RULES, &params).unwrap();
    assert_eq!(
        output,
        "UsqlScript ScriptName=(ScriptName:default,Idf.usql) AnalyticsAccountName=matrixadlaprod \
         PATHIN_1={in:EncryptedAzureBlobPath:1} \
         OutputReferenceEncrypted_={out:AzureBlobPath:} \
         PARAM_Count=[(Count:int,,:default,5)] \
         PARAM_Limit=[(Limit:int,,)] \
         PARAM_Label=\"[(Label)]\""
    );
}

#[test]
fn test_unknown_identifier_rejects_configuration() {
    let rules = r#"{"Template": "", "Rules": [
        {"TypePattern": "", "NamePattern": "(.*)", "Format": "${require('fs')}"}
    ]}"#;

    assert!(matches!(
        CommandBuilder::from_json(rules),
        Err(RuleError::Format { .. })
    ));
    assert_eq!(build(rules, &table(&[("A", "", "")])), None);
}

#[test]
fn test_malformed_configurations() {
    let params = table(&[("A", "", "")]);
    assert_eq!(build("not json", &params), None);
    assert_eq!(build(r#"{"Template": ""}"#, &params), None);
    assert_eq!(
        build(
            r#"{"Template": "", "Rules": [{"TypePattern": "(", "NamePattern": "", "Format": ""}]}"#,
            &params
        ),
        None
    );
}

#[test]
fn test_legacy_key_spelling() {
    let rules = r#"{"template": "@@PARAMS@@", "rules": [
        {"typePattern": "", "namePattern": "(.*)", "format": "${name[1]}=${value}"}
    ]}"#;
    assert_eq!(build(rules, &table(&[("A", "1", "")])).unwrap(), "A=1");
}
