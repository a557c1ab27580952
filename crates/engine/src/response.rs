//! Response documents mirroring the request's group/test structure

use acvp_api::{AlgorithmId, Error, Location, OutputValue, Result, TestCase};
use acvp_common::codec::bin_to_hex;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::schema::{OutputKind, OutputSpec, SchemaRow};

/// Result of one test case: `{tcId, <outputs>}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResponse {
    pub tc_id: u64,
    #[serde(flatten)]
    pub outputs: Map<String, Value>,
}

/// Result of one group: `{tgId, <group-derived fields>, tests}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupResponse {
    pub tg_id: u64,
    #[serde(flatten)]
    pub derived: Map<String, Value>,
    pub tests: Vec<TestResponse>,
}

impl GroupResponse {
    pub fn new(tg_id: u64) -> Self {
        Self { tg_id, derived: Map::new(), tests: Vec::new() }
    }

    /// Set a group-derived field unless it is already present
    ///
    /// Returns whether the value was stored.
    pub fn set_derived_once(&mut self, name: &str, value: Value) -> bool {
        if self.derived.contains_key(name) {
            return false;
        }
        self.derived.insert(name.to_owned(), value);
        true
    }
}

/// A complete response for one vector set
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vs_id: Option<u64>,
    pub algorithm: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    pub test_groups: Vec<GroupResponse>,
}

impl ResponseDocument {
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    /// Wrap in the protocol envelope `[{"acvVersion": ..}, body]`
    pub fn to_envelope(&self, acv_version: &str) -> serde_json::Result<Value> {
        Ok(json!([{ "acvVersion": acv_version }, self.to_value()?]))
    }

    pub fn to_json_string(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    /// Number of test results across all groups
    pub fn test_count(&self) -> usize {
        self.test_groups.iter().map(|g| g.tests.len()).sum()
    }
}

/// Assembles a [`ResponseDocument`] as groups complete
#[derive(Debug)]
pub struct ResponseBuilder {
    doc: ResponseDocument,
}

impl ResponseBuilder {
    pub fn new(vs_id: Option<u64>, algorithm: AlgorithmId) -> Self {
        Self {
            doc: ResponseDocument {
                vs_id,
                algorithm: algorithm.algorithm().to_owned(),
                mode: algorithm.mode().map(str::to_owned),
                test_groups: Vec::new(),
            },
        }
    }

    /// Serialize the promised outputs of a completed case, in schema order
    ///
    /// A promised output the handler left unwritten is reported as a
    /// crypto-module failure at that case.
    pub fn test_response(row: &SchemaRow, case: &TestCase) -> Result<TestResponse> {
        let mut outputs = Map::new();
        for spec in row.outputs {
            outputs.insert(spec.name.to_owned(), render(row, spec, case)?);
        }
        Ok(TestResponse { tc_id: case.tc_id, outputs })
    }

    /// Copy the row's group-derived outputs from `case` into `group`
    pub fn derive_group_fields(row: &SchemaRow, case: &TestCase, group: &mut GroupResponse) -> Result<()> {
        for spec in row.group_outputs {
            if !group.derived.contains_key(spec.name) {
                group.set_derived_once(spec.name, render(row, spec, case)?);
            }
        }
        Ok(())
    }

    pub fn push_group(&mut self, group: GroupResponse) {
        self.doc.test_groups.push(group);
    }

    pub fn finish(self) -> ResponseDocument {
        self.doc
    }
}

fn render(row: &SchemaRow, spec: &OutputSpec, case: &TestCase) -> Result<Value> {
    let at = Location::case(case.tg_id, case.tc_id).with_field(spec.name);
    match (spec.kind, case.output(spec.name)) {
        (OutputKind::Hex, Some(OutputValue::Hex(bytes))) => bin_to_hex(bytes, row.max_hex_len())
            .map(Value::String)
            .map_err(|e| Error::crypto(at, e.to_string())),
        (OutputKind::Bool, Some(OutputValue::Bool(b))) => Ok(Value::Bool(b)),
        (_, Some(_)) => Err(Error::crypto(at, "handler produced an output of the wrong kind")),
        (_, None) => Err(Error::crypto(at, "handler did not produce a promised output")),
    }
}
