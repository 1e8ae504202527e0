use pvflow::input::FlowInput;
use schemars::schema_for;

#[test]
fn test_generate_json_schema() {
    let schema = schema_for!(FlowInput);
    assert!(serde_json::to_string_pretty(&schema).is_ok());
}

#[test]
fn test_schema_uses_input_field_names() {
    let schema = serde_json::to_value(schema_for!(FlowInput)).unwrap();
    let properties = schema["properties"].as_object().unwrap();
    assert!(properties.contains_key("basics"));
    assert!(properties.contains_key("annualProductionOverrideKWh"));
    assert!(properties.contains_key("directUseOverrideKWh"));

    let required = schema["required"].as_array().unwrap();
    assert!(!required.iter().any(|field| field == "directUseOverrideKWh"));

    let basics = &schema["definitions"]["ProjectBasics"]["properties"];
    assert!(basics.get("annualConsumptionHouseholdKWh").is_some());
}
