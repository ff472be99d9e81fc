//! Reading item and form files and `NAME=VALUE` field arguments.

use formsift::error::{FilterError, Result};
use formsift::field::FieldDescriptor;
use formsift::model::{Container, Document, Form, Item};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum ItemsFile {
    Document(Document),
    Container(Container),
    Items(Vec<Item>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FormsFile {
    Many(Vec<Form>),
    One(Form),
}

pub fn load_document(path: &Path) -> Result<Document> {
    let content = fs::read_to_string(path)?;
    let document = match serde_json::from_str(&content)? {
        ItemsFile::Document(doc) => doc,
        ItemsFile::Container(container) => Document {
            containers: vec![container],
        },
        ItemsFile::Items(items) => Document {
            containers: vec![Container::new(None, items)],
        },
    };
    Ok(document)
}

pub fn load_forms(path: &Path) -> Result<Vec<Form>> {
    let content = fs::read_to_string(path)?;
    let forms = match serde_json::from_str(&content)? {
        FormsFile::Many(forms) => forms,
        FormsFile::One(form) => vec![form],
    };
    Ok(forms)
}

/// Parses `NAME=VALUE`, rejecting names without an attribute.
pub fn parse_field(arg: &str) -> Result<(String, String)> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| FilterError::Cli(format!("Expected NAME=VALUE, got \"{}\"", arg)))?;
    FieldDescriptor::parse_strict(name)?;
    Ok((name.to_string(), value.to_string()))
}

pub fn parse_fields(args: &[String]) -> Result<Vec<(String, String)>> {
    args.iter().map(|a| parse_field(a)).collect()
}
