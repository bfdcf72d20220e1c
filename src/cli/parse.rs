use treasurer::error::Result;
use treasurer::parser::{clean_description, parse_description, PaymentType};

pub fn run(description: &str, transaction_type: &str) -> Result<()> {
    let parsed = parse_description(description, transaction_type);
    println!("Type:        {}", PaymentType::from_code(transaction_type).name());
    println!("Description: {}", clean_description(description));
    println!("Name:        {}", display(&parsed.name));
    println!("Reference:   {}", display(&parsed.reference));
    Ok(())
}

fn display(value: &str) -> &str {
    if value.is_empty() {
        "(none)"
    } else {
        value
    }
}
