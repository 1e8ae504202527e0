use pvflow::input::FlowInput;
use schemars::schema_for;

fn main() {
    let schema = schema_for!(FlowInput);
    println!("{}", serde_json::to_string_pretty(&schema).unwrap());
}
