//! Tests for the Validatable derive macro - successful cases.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use structval::{Schema, Validatable, Validator};

#[derive(Serialize, Validatable)]
#[serde(rename_all = "PascalCase")]
pub struct Address {
    #[validate(rules = "required")]
    pub street: String,
    #[validate(rules = "required")]
    pub city: String,
}

#[derive(Serialize, Validatable)]
#[serde(rename_all = "PascalCase")]
pub struct School {
    #[validate(rules = "required")]
    pub name: String,
}

/// A struct using every field option.
#[derive(Serialize, Validatable)]
#[serde(rename_all = "camelCase")]
#[validate(name = "Customer")]
pub struct CustomerRecord {
    #[validate(rules = "required,min=5,max=25")]
    pub full_name: String,
    #[serde(rename = "mail")]
    #[validate(rules = "required,email|numeric")]
    pub contact: String,
    #[validate(rules = "required", nested)]
    pub home: Address,
    #[validate(rules = "omitempty,dive", nested)]
    pub others: Option<Vec<Address>>,
    #[validate(rules = "dive,keys,required,min=2,endkeys,dive", nested)]
    pub schools: BTreeMap<String, School>,
    #[validate(rules = "dive,keys,required,endkeys,required,gt=1000")]
    pub wallet: HashMap<String, i64>,
    #[validate(nested = Address)]
    pub billing: Box<Address>,
    #[validate(skip)]
    pub internal: u32,
    #[serde(skip)]
    #[validate(rules = "required")]
    pub transient: String,
    pub untouched: bool,
}

/// Self-referential types build their schema lazily.
#[derive(Serialize, Validatable)]
pub struct Node {
    #[validate(rules = "required")]
    pub label: String,
    #[validate(rules = "dive", nested)]
    pub children: Vec<Node>,
}

/// Generic structs keep their parameters.
#[derive(Serialize, Validatable)]
pub struct Page<T: Serialize> {
    #[validate(rules = "required")]
    pub items: Vec<T>,
    #[validate(rules = "gte=0")]
    pub r#offset: u64,
}

fn main() {
    let schema: Schema = CustomerRecord::schema();
    assert_eq!(schema.name(), Some("Customer"));
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        ["fullName", "mail", "home", "others", "schools", "wallet", "billing"]
    );

    let node = Node {
        label: "root".into(),
        children: vec![Node { label: String::new(), children: vec![] }],
    };
    let errors = Validator::new().validate_struct(&node).unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.errors()[0].namespace, "Node.children[0].label");

    let page = Page::<u8> { items: vec![], r#offset: 0 };
    let schema = Page::<u8>::schema();
    assert_eq!(schema.get("offset").map(|f| f.rules.as_str()), Some("gte=0"));
    assert_eq!(page.validate().unwrap().len(), 1);
}
