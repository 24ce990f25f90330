use indexmap::IndexMap;

use crate::error::DocumentError;
use crate::ir::{
    CanonicalOperation, CanonicalParameter, CanonicalResponse, ParameterLocation, RequestBody,
    RequestModel, ResolvedProperty, ResolvedType,
};
use crate::parse::definitions::DefinitionTable;
use crate::parse::document::{
    ParameterOrRef, RawDocument, RawOperation, RawParameter, RawRequestBody, RawResponse,
    RequestBodyOrRef, ResponseOrRef, json_media_type, read_items,
};
use crate::parse::schema::decoded_ref_name;

use super::schema_resolver::SchemaResolver;

const MULTIPART_FORM: &str = "multipart/form-data";

/// Build one [`CanonicalOperation`] per (path, method) pair of a document.
///
/// Only a missing or non-object `paths` is an error. Operations, parameters and
/// responses that cannot be read are skipped with a warning.
pub fn normalize(doc: &RawDocument) -> Result<Vec<CanonicalOperation>, DocumentError> {
    normalize_with_definitions(doc, &DefinitionTable::new())
}

/// Like [`normalize`], with extra definitions (for instance models scraped from
/// a rendered page) merged under the document's own definitions.
pub fn normalize_with_definitions(
    doc: &RawDocument,
    fallback: &DefinitionTable,
) -> Result<Vec<CanonicalOperation>, DocumentError> {
    let paths = doc.paths_object()?;
    let table = DefinitionTable::from_document(doc).with_fallback(fallback);
    let normalizer = Normalizer {
        doc,
        resolver: SchemaResolver::new(&table),
    };

    let mut operations = Vec::new();
    for (path, item) in paths {
        let Some(item) = item.as_object() else {
            log::debug!("skipping path `{path}`: path item is not an object");
            continue;
        };

        let shared: Vec<ParameterOrRef> = item
            .get("parameters")
            .map(|value| read_items(value.clone()))
            .unwrap_or_default();

        for (method, value) in item {
            if method == "parameters" {
                continue;
            }
            if !value.is_object() || method.starts_with("x-") {
                log::debug!("skipping `{method}` under `{path}`: not an operation");
                continue;
            }
            let raw: RawOperation = match serde_json::from_value(value.clone()) {
                Ok(raw) => raw,
                Err(e) => {
                    log::warn!("skipping {} {path}: {e}", method.to_uppercase());
                    continue;
                }
            };
            operations.push(normalizer.operation(path, method, &raw, &shared));
        }
    }

    Ok(operations)
}

struct Normalizer<'a> {
    doc: &'a RawDocument,
    resolver: SchemaResolver<'a>,
}

impl Normalizer<'_> {
    fn operation(
        &self,
        path: &str,
        method: &str,
        raw: &RawOperation,
        shared: &[ParameterOrRef],
    ) -> CanonicalOperation {
        let method = method.to_uppercase();
        let operation_id = raw.operation_id.clone().filter(|id| !id.is_empty());
        let id = operation_id
            .clone()
            .unwrap_or_else(|| format!("{method}_{path}"));

        let mut parameters = Vec::new();
        let mut request_model = RequestModel::default();

        for param in self.merge_parameters(shared, &raw.parameters) {
            let schema = param.schema_node();
            let resolved_type = self.resolver.resolve(schema.as_ref());
            let required = param.required || param.location == ParameterLocation::Path;
            let property = ResolvedProperty::new(resolved_type.clone(), required);

            match param.location {
                ParameterLocation::Path => {
                    request_model.path.insert(param.name.clone(), property);
                }
                ParameterLocation::Query => {
                    request_model.query.insert(param.name.clone(), property);
                }
                ParameterLocation::Header => {
                    request_model.header.insert(param.name.clone(), property);
                }
                ParameterLocation::Cookie => {
                    request_model.cookie.insert(param.name.clone(), property);
                }
                ParameterLocation::FormData => {
                    request_model.form_data.insert(param.name.clone(), property);
                }
                ParameterLocation::Body => {
                    if request_model.body.is_some() {
                        log::warn!("{method} {path}: more than one body parameter; keeping the first");
                    } else {
                        request_model.body = Some(RequestBody {
                            resolved_type: resolved_type.clone(),
                            required,
                        });
                    }
                }
            }

            parameters.push(CanonicalParameter {
                name: param.name,
                location: param.location,
                resolved_type,
                required,
                description: param.description,
            });
        }

        if let Some(body) = raw.request_body.as_ref().and_then(|b| self.request_body(b)) {
            self.fold_request_body(&body, &mut request_model, &method, path);
        }

        if request_model.body.is_some() && !request_model.form_data.is_empty() {
            log::warn!(
                "{method} {path}: declares both a JSON body and form data; dropping the form data target"
            );
            request_model.form_data.clear();
            parameters.retain(|p| p.location != ParameterLocation::FormData);
        }

        let responses_by_status = raw
            .responses
            .iter()
            .map(|(status, resp)| (status.clone(), self.response(resp)))
            .collect();

        CanonicalOperation {
            id,
            operation_id,
            path: path.to_string(),
            method,
            summary: raw.summary.clone().unwrap_or_default(),
            description: raw.description.clone(),
            tags: raw.tags.clone(),
            deprecated: raw.deprecated.unwrap_or(false),
            parameters,
            request_model,
            responses_by_status,
        }
    }

    /// Path-level parameters followed by operation-level ones; an operation
    /// parameter replaces a shared one with the same name and location.
    fn merge_parameters(&self, shared: &[ParameterOrRef], own: &[ParameterOrRef]) -> Vec<RawParameter> {
        let mut merged: IndexMap<(String, ParameterLocation), RawParameter> = IndexMap::new();
        for param in shared.iter().chain(own) {
            if let Some(param) = self.parameter(param) {
                merged.insert((param.name.clone(), param.location), param);
            }
        }
        merged.into_values().collect()
    }

    fn parameter(&self, param: &ParameterOrRef) -> Option<RawParameter> {
        let ref_path = match param {
            ParameterOrRef::Parameter(p) => return Some(p.clone()),
            ParameterOrRef::Ref { ref_path } => ref_path,
        };
        let name = decoded_ref_name(ref_path);
        let found = if ref_path.starts_with("#/components/") {
            self.doc
                .components
                .as_ref()
                .and_then(|c| c.parameters.get(&name))
        } else {
            self.doc.parameters.get(&name)
        };
        match found {
            Some(ParameterOrRef::Parameter(p)) => Some(p.clone()),
            _ => {
                log::warn!("unresolvable parameter reference `{ref_path}`; skipping it");
                None
            }
        }
    }

    fn request_body(&self, body: &RequestBodyOrRef) -> Option<RawRequestBody> {
        let ref_path = match body {
            RequestBodyOrRef::RequestBody(b) => return Some(b.clone()),
            RequestBodyOrRef::Ref { ref_path } => ref_path,
        };
        let name = decoded_ref_name(ref_path);
        match self
            .doc
            .components
            .as_ref()
            .and_then(|c| c.request_bodies.get(&name))
        {
            Some(RequestBodyOrRef::RequestBody(b)) => Some(b.clone()),
            _ => {
                log::warn!("unresolvable request body reference `{ref_path}`; ignoring it");
                None
            }
        }
    }

    fn fold_request_body(&self, body: &RawRequestBody, model: &mut RequestModel, method: &str, path: &str) {
        if let Some(schema) = json_media_type(&body.content).and_then(|m| m.schema.as_ref()) {
            if model.body.is_some() {
                log::warn!("{method} {path}: requestBody alongside a body parameter; keeping the parameter");
            } else {
                model.body = Some(RequestBody {
                    resolved_type: self.resolver.resolve(Some(schema)),
                    required: body.required,
                });
            }
        }

        if let Some(schema) = body.content.get(MULTIPART_FORM).and_then(|m| m.schema.as_ref()) {
            match self.resolver.resolve(Some(schema)) {
                ResolvedType::Object(obj) => {
                    for (name, property) in obj.properties {
                        model.form_data.entry(name).or_insert(property);
                    }
                }
                other => {
                    log::warn!(
                        "{method} {path}: multipart body is not an object ({other:?}); ignoring it"
                    );
                }
            }
        }
    }

    fn response(&self, resp: &ResponseOrRef) -> CanonicalResponse {
        let Some(resp) = self.lookup_response(resp) else {
            return CanonicalResponse {
                description: String::new(),
                resolved_type: None,
            };
        };
        let schema = json_media_type(&resp.content)
            .and_then(|m| m.schema.as_ref())
            .or(resp.schema.as_ref());
        CanonicalResponse {
            description: resp.description.clone(),
            resolved_type: schema.map(|s| self.resolver.resolve(Some(s))),
        }
    }

    fn lookup_response<'r>(&'r self, resp: &'r ResponseOrRef) -> Option<&'r RawResponse> {
        let ref_path = match resp {
            ResponseOrRef::Response(r) => return Some(r),
            ResponseOrRef::Ref { ref_path } => ref_path,
        };
        let name = decoded_ref_name(ref_path);
        let found = if ref_path.starts_with("#/components/") {
            self.doc
                .components
                .as_ref()
                .and_then(|c| c.responses.get(&name))
        } else {
            self.doc.responses.get(&name)
        };
        match found {
            Some(ResponseOrRef::Response(r)) => Some(r),
            _ => {
                log::warn!("unresolvable response reference `{ref_path}`; treating it as bodiless");
                None
            }
        }
    }
}
