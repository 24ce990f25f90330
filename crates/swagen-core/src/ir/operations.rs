use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::types::{ObjectType, ResolvedProperty, ResolvedType};

/// Where a parameter travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
    FormData,
    Body,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Cookie => "cookie",
            ParameterLocation::FormData => "formData",
            ParameterLocation::Body => "body",
        }
    }
}

/// A resolved parameter as declared by the operation (or its path item).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalParameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(rename = "type")]
    pub resolved_type: ResolvedType,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The JSON body of a request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestBody {
    #[serde(rename = "type")]
    pub resolved_type: ResolvedType,
    pub required: bool,
}

/// Parameters and body grouped by where they travel.
///
/// An operation carries at most one of `body` and `form_data`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestModel {
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub path: IndexMap<String, ResolvedProperty>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub query: IndexMap<String, ResolvedProperty>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub header: IndexMap<String, ResolvedProperty>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub cookie: IndexMap<String, ResolvedProperty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<RequestBody>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub form_data: IndexMap<String, ResolvedProperty>,
}

impl RequestModel {
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
            && self.query.is_empty()
            && self.header.is_empty()
            && self.cookie.is_empty()
            && self.body.is_none()
            && self.form_data.is_empty()
    }

    /// The whole request as a single object shape, one member per non-empty group.
    pub fn shape(&self) -> ResolvedType {
        let mut groups = IndexMap::new();
        let mut push_group = |name: &str, members: &IndexMap<String, ResolvedProperty>| {
            if members.is_empty() {
                return;
            }
            let required = members.values().any(|m| m.required);
            let ty = ResolvedType::Object(ObjectType::anonymous(members.clone()));
            groups.insert(name.to_string(), ResolvedProperty::new(ty, required));
        };
        push_group("path", &self.path);
        push_group("query", &self.query);
        push_group("headers", &self.header);
        push_group("cookies", &self.cookie);
        push_group("formData", &self.form_data);
        if let Some(body) = &self.body {
            groups.insert(
                "body".to_string(),
                ResolvedProperty::new(body.resolved_type.clone(), body.required),
            );
        }
        ResolvedType::Object(ObjectType::anonymous(groups))
    }
}

/// A response for one status code. `resolved_type` is `None` when the
/// response carries no body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalResponse {
    pub description: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resolved_type: Option<ResolvedType>,
}

/// The normalized, reference-free representation of one (path, method) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalOperation {
    /// `operationId`, or `METHOD_path` when absent.
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    pub path: String,
    /// Upper-cased HTTP method.
    pub method: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub deprecated: bool,
    pub parameters: Vec<CanonicalParameter>,
    pub request_model: RequestModel,
    pub responses_by_status: IndexMap<String, CanonicalResponse>,
}

impl CanonicalOperation {
    /// The first response whose status code starts with `2`, in authored order.
    pub fn success_response(&self) -> Option<(&str, &CanonicalResponse)> {
        self.responses_by_status
            .iter()
            .find(|(status, _)| status.starts_with('2'))
            .map(|(status, resp)| (status.as_str(), resp))
    }

    pub fn parameters_in(
        &self,
        location: ParameterLocation,
    ) -> impl Iterator<Item = &CanonicalParameter> {
        self.parameters
            .iter()
            .filter(move |p| p.location == location)
    }
}
