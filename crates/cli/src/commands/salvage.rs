// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use serde_json::{Map, Value};

use revenant_core::payload::{SalvagePayload, StateFile};
use revenant_core::salvage::{SalvageProtocol, SalvageReceipt};

use super::table;

pub async fn run(
    protocol: &SalvageProtocol,
    files: Vec<StateFile>,
    metadata: Map<String, Value>,
) -> anyhow::Result<SalvageReceipt> {
    let count = files.len();
    let payload = SalvagePayload::build(files, metadata);
    let receipt = protocol.salvage(&payload).await?;

    let mut t = table(vec!["Field", "Value"]);
    t.add_row(vec!["Id", receipt.id.as_str()]);
    t.add_row(vec!["Status", receipt.status.as_str()]);
    t.add_row(vec!["Files", &count.to_string()]);
    if let Some(size) = receipt.size {
        t.add_row(vec!["Size", &format!("{} bytes", size)]);
    }
    if let Some(hash) = &receipt.content_hash {
        t.add_row(vec!["Digest", hash.as_str()]);
    }
    if let Some(message) = &receipt.message {
        t.add_row(vec!["Note", message.as_str()]);
    }
    println!("{t}");

    Ok(receipt)
}
