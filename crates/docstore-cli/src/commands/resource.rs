//! Resource commands
//!
//! Usage:
//!   docstore create <JSON>
//!   docstore fetch <ID>
//!   docstore list [--limit N] [--offset N]
//!   docstore patch <ID> <JSON>
//!   docstore update <ID> <JSON>
//!   docstore delete <ID>
//!   docstore count
//!
//! A JSON argument of `-` is read from stdin.

use super::Target;
use clap::Args;
use docstore_core::{Record, ResourceError, StoreError};
use docstore_store::ResourceStore;
use serde_json::{Map, Value};
use std::io::Read;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// JSON object holding the resource fields
    pub json: String,
}

#[derive(Debug, Args)]
pub struct IdArgs {
    /// Resource id
    pub id: String,
}

#[derive(Debug, Args)]
pub struct WriteArgs {
    /// Resource id
    pub id: String,

    /// JSON object holding the fields to write
    pub json: String,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Maximum number of resources to print
    #[arg(long)]
    pub limit: Option<u32>,

    /// Resources to skip; ignored unless --limit is given
    #[arg(long)]
    pub offset: Option<u32>,
}

pub fn create(target: &Target, args: CreateArgs) -> CmdResult {
    let fields = parse_fields(&args.json)?;
    let conn = target.connect()?;
    let store = ResourceStore::new(&conn, target.table.as_str())?;

    print_json(&store.create(fields)?)
}

pub fn fetch(target: &Target, args: IdArgs) -> CmdResult {
    let conn = target.connect()?;
    let store = ResourceStore::new(&conn, target.table.as_str())?;

    print_json(&store.fetch(&args.id)?)
}

pub fn list(target: &Target, args: ListArgs) -> CmdResult {
    let conn = target.connect()?;
    let store = ResourceStore::new(&conn, target.table.as_str())?;

    print_json(&store.fetch_all(args.limit, args.offset)?)
}

pub fn patch(target: &Target, args: WriteArgs) -> CmdResult {
    let fields = parse_fields(&args.json)?;
    let conn = target.connect()?;
    let store = ResourceStore::new(&conn, target.table.as_str())?;

    print_json(&store.patch(&args.id, fields)?)
}

pub fn update(target: &Target, args: WriteArgs) -> CmdResult {
    let fields = parse_fields(&args.json)?;
    let conn = target.connect()?;
    let store = ResourceStore::new(&conn, target.table.as_str())?;

    print_json(&store.update(&args.id, fields)?)
}

pub fn delete(target: &Target, args: IdArgs) -> CmdResult {
    let conn = target.connect()?;
    let store = ResourceStore::new(&conn, target.table.as_str())?;

    let deleted = store.delete(&args.id)?;
    print_json(&serde_json::json!({ "id": args.id, "deleted": deleted }))
}

pub fn count(target: &Target) -> CmdResult {
    let conn = target.connect()?;
    let store = ResourceStore::new(&conn, target.table.as_str())?;

    print_json(&serde_json::json!({ "count": store.count()? }))
}

/// Parse a JSON object argument, reading stdin for `-`
fn parse_fields(raw: &str) -> Result<Map<String, Value>, Box<dyn std::error::Error>> {
    let text = if raw == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        raw.to_string()
    };

    let value: Value = serde_json::from_str(&text).map_err(|e| {
        StoreError::from(ResourceError::InvalidPayload {
            reason: e.to_string(),
        })
        .with_op("parse_fields")
    })?;

    let record =
        Record::from_value(value).map_err(|e| StoreError::from(e).with_op("parse_fields"))?;
    Ok(record.into_fields())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
