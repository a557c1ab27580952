//! The vector-set walker
//!
//! Walks a vector set group by group and case by case, in document order,
//! validating each object against its [`SchemaRow`], dispatching the bound
//! [`TestCase`] to the registered handler and collecting the outputs. Any
//! error aborts the whole vector set; no partial response is returned.

use acvp_api::{
    AlgorithmFamily, AlgorithmId, CapabilityHandler, Error, FieldSet, Location, Result, TestCase,
    TestType,
};
use acvp_common::json::{self, JsonKindError};
use serde_json::{Map, Value};
use tracing::{debug, error, info};

use crate::ingest::ingest;
use crate::registry::CapabilityRegistry;
use crate::response::{GroupResponse, ResponseBuilder, ResponseDocument, TestResponse};
use crate::schema::{self, SchemaRow};

/// Processes vector sets against a registry
#[derive(Debug, Clone, Copy)]
pub struct VectorSetProcessor<'r> {
    registry: &'r CapabilityRegistry,
}

impl<'r> VectorSetProcessor<'r> {
    pub fn new(registry: &'r CapabilityRegistry) -> Self {
        Self { registry }
    }

    /// Process one (unwrapped) vector-set document
    pub fn process(&self, request: &Value) -> Result<ResponseDocument> {
        let result = self.walk(request);
        if let Err(e) = &result {
            error!(kind = ?e.kind(), "vector set aborted: {}", e);
        }
        result
    }

    fn walk(&self, request: &Value) -> Result<ResponseDocument> {
        let at = Location::vector_set();
        let obj = json::as_object(request, "vector set").map_err(|e| malformed(at, e))?;

        let vs_id = json::get_u64(obj, "vsId").map_err(|e| malformed(at, e))?;
        let algorithm = resolve_algorithm(obj)?;

        let entry = self
            .registry
            .lookup(algorithm)
            .ok_or_else(|| Error::UnsupportedOperation { algorithm: algorithm.to_string() })?;

        let groups = json::get_array(obj, "testGroups")
            .map_err(|e| malformed(at, e))?
            .ok_or_else(|| Error::malformed(at.with_field("testGroups"), "testGroups is absent"))?;

        info!(%algorithm, ?vs_id, groups = groups.len(), "processing vector set");

        let mut builder = ResponseBuilder::new(vs_id, algorithm);
        for group in groups {
            builder.push_group(process_group(algorithm, entry.handler(), group)?);
        }

        let doc = builder.finish();
        info!(%algorithm, ?vs_id, tests = doc.test_count(), "vector set complete");
        Ok(doc)
    }
}

fn resolve_algorithm(obj: &Map<String, Value>) -> Result<AlgorithmId> {
    let at = Location::vector_set();
    let name = json::get_str(obj, "algorithm")
        .map_err(|e| malformed(at, e))?
        .ok_or_else(|| Error::malformed(at.with_field("algorithm"), "algorithm is absent"))?;
    let mode = json::get_str(obj, "mode").map_err(|e| malformed(at, e))?;

    let family = AlgorithmFamily::from_name(name)
        .ok_or_else(|| Error::invalid(at.with_field("algorithm"), format!("unknown algorithm '{}'", name)))?;
    if family.requires_mode() && mode.is_none() {
        return Err(Error::malformed(at.with_field("mode"), format!("{} requires a mode", name)));
    }

    AlgorithmId::resolve(name, mode).ok_or_else(|| {
        Error::invalid(
            at.with_field("mode"),
            format!("unknown mode {:?} for algorithm '{}'", mode, name),
        )
    })
}

fn process_group(
    algorithm: AlgorithmId,
    handler: &dyn CapabilityHandler,
    group: &Value,
) -> Result<GroupResponse> {
    let vs = Location::vector_set();
    let obj = json::as_object(group, "testGroups[]").map_err(|e| malformed(vs, e))?;
    let tg_id = positive_id(obj, "tgId", vs)?;
    let at = Location::group(tg_id);

    let test_type = match json::get_str(obj, "testType").map_err(|e| malformed(at, e))? {
        Some(s) => TestType::parse(s)
            .ok_or_else(|| Error::invalid(at.with_field("testType"), format!("unknown testType '{}'", s)))?,
        None => return Err(Error::invalid(at.with_field("testType"), "testType is absent")),
    };
    let row = schema::lookup(algorithm, test_type).ok_or_else(|| {
        Error::invalid(at.with_field("testType"), format!("{} has no {} tests", algorithm, test_type))
    })?;

    let group_fields = ingest(obj, row.group, &FieldSet::new(), row.capacity, at)?;

    let tests = match json::get_array(obj, "tests").map_err(|e| malformed(at, e))? {
        Some(tests) if !tests.is_empty() => tests,
        _ => return Err(Error::missing(at, "tests")),
    };

    debug!(tg_id, %test_type, tests = tests.len(), "processing group");

    let mut response = GroupResponse::new(tg_id);
    for (i, test) in tests.iter().enumerate() {
        let first_in_group = i == 0;
        let case = bind_case(algorithm, test_type, row, &group_fields, tg_id, first_in_group, test)?;
        let tc_id = case.tc_id;
        let test_response = run_case(handler, row, case, &mut response)?;
        debug!(tg_id, tc_id, "test case complete");
        response.tests.push(test_response);
    }
    Ok(response)
}

fn bind_case(
    algorithm: AlgorithmId,
    test_type: TestType,
    row: &SchemaRow,
    group_fields: &FieldSet,
    tg_id: u64,
    first_in_group: bool,
    test: &Value,
) -> Result<TestCase> {
    let at = Location::group(tg_id);
    let obj = json::as_object(test, "tests[]").map_err(|e| malformed(at, e))?;
    let tc_id = positive_id(obj, "tcId", at)?;
    let at = Location::case(tg_id, tc_id);

    let mut fields = ingest(obj, row.test, group_fields, row.capacity, at)?;
    fields.inherit(group_fields);
    TestCase::from_fields(algorithm, test_type, tg_id, tc_id, first_in_group, fields, row.capacity)
}

/// Execute one case and serialize its outputs
///
/// The case is consumed; its buffers are zeroized on every path out.
fn run_case(
    handler: &dyn CapabilityHandler,
    row: &SchemaRow,
    mut case: TestCase,
    group: &mut GroupResponse,
) -> Result<TestResponse> {
    let at = Location::case(case.tg_id, case.tc_id);
    debug!(tg_id = case.tg_id, tc_id = case.tc_id, "executing test case");

    handler
        .handle(&mut case)
        .map_err(|failure| Error::crypto(at, failure.message()))?;

    let test_response = ResponseBuilder::test_response(row, &case)?;
    if case.first_in_group {
        ResponseBuilder::derive_group_fields(row, &case, group)?;
    }
    drop(case);
    Ok(test_response)
}

/// Read a server-assigned id: absent is a missing field, anything but a
/// positive integer is malformed
fn positive_id(obj: &Map<String, Value>, field: &'static str, at: Location) -> Result<u64> {
    match json::get_u64(obj, field) {
        Ok(Some(0)) => Err(Error::malformed(at.with_field(field), format!("{} must be positive", field))),
        Ok(Some(id)) => Ok(id),
        Ok(None) => Err(Error::missing(at, field)),
        Err(e) => Err(malformed(at, e)),
    }
}

fn malformed(at: Location, e: JsonKindError) -> Error {
    Error::malformed(at.with_field(e.field), e.to_string())
}
