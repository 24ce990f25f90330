use swagen_core::config::GenerationOptions;
use swagen_core::ir::CanonicalOperation;
use swagen_core::parse::{self, RawDocument};
use swagen_core::transform::normalize;

use super::*;

const PETS: &str = r##"
openapi: 3.0.0
info:
  title: Pets
  version: "1"
paths:
  /pets/{id}:
    get:
      operationId: getPet
      summary: Fetch one pet
      parameters:
        - { name: id, in: path, required: true, schema: { type: integer } }
        - { name: verbose, in: query, schema: { type: boolean } }
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema:
                type: object
                required: [id]
                properties:
                  id: { type: integer }
                  name: { type: string }
  /pets:
    post:
      operationId: createPet
      summary: Add a pet
      requestBody:
        required: true
        content:
          application/json:
            schema: { $ref: "#/components/schemas/Pet" }
      responses:
        "201":
          description: created
          content:
            application/json:
              schema: { $ref: "#/components/schemas/Pet" }
  /pets/{id}/photo:
    put:
      parameters:
        - { name: id, in: path, required: true, schema: { type: integer } }
        - { name: X-Trace-Id, in: header, schema: { type: string } }
      requestBody:
        content:
          multipart/form-data:
            schema:
              type: object
              required: [file]
              properties:
                file: { type: string, format: binary }
                caption: { type: string }
      responses:
        "204":
          description: stored
components:
  schemas:
    Pet:
      type: object
      required: [name]
      properties:
        name: { type: string }
        tags: { type: array, items: { type: string } }
"##;

fn ops() -> Vec<CanonicalOperation> {
    let value = parse::from_yaml(PETS).unwrap();
    normalize(&RawDocument::from_value(value).unwrap()).unwrap()
}

#[test]
fn test_request_type_groups_parameters() {
    let ops = ops();
    let options = GenerationOptions::default();
    insta::assert_snapshot!(FetchEmitter.emit_request_type(&ops[0], &options), @r"
    export interface GetPetRequest {
      id: number;
      query?: {
        verbose?: boolean;
      };
      headers?: Record<string, string>;
    }
    ");
    insta::assert_snapshot!(FetchEmitter.emit_request_type(&ops[2], &options), @r"
    export interface PutPetsIdPhotoRequest {
      id: number;
      headers?: {
        xTraceId?: string;
      };
      formData: {
        file: Blob;
        caption?: string;
      };
    }
    ");
}

#[test]
fn test_response_type_marks_required_fields() {
    let ops = ops();
    let options = GenerationOptions::default();
    insta::assert_snapshot!(FetchEmitter.emit_response_type(&ops[0], &options), @r"
    export interface GetPetResponse {
      data: {
        id: number;
        name?: string;
      };
      status: number;
      statusText: string;
      headers: Record<string, string>;
    }
    ");
    assert!(
        FetchEmitter
            .emit_response_type(&ops[2], &options)
            .contains("  data: void;")
    );
    assert!(
        FetchEmitter
            .emit_request_type(&ops[1], &options)
            .contains("  body: Pet;")
    );
}

#[test]
fn test_fetch_implementation() {
    let ops = ops();
    let out = FetchEmitter
        .emit_implementation(&ops[0], &GenerationOptions::default())
        .unwrap();
    insta::assert_snapshot!(out, @r#"
    // GET /pets/{id}
    export async function getPet(params: GetPetRequest): Promise<GetPetResponse> {
      let url = `${API_BASE_URL}/pets/${encodeURIComponent(String(params.id))}`;
      const query: Record<string, unknown> = {
        'verbose': params.query?.verbose,
      };
      const search = new URLSearchParams();
      for (const [key, value] of Object.entries(query)) {
        if (Array.isArray(value)) value.forEach((item) => search.append(key, String(item)));
        else if (value !== undefined && value !== null) search.append(key, String(value));
      }
      const qs = search.toString();
      if (qs) url += `?${qs}`;
      const headers: Record<string, string> = {};
      if (params.headers) Object.assign(headers, params.headers);
      const res = await fetch(url, {
        method: 'GET',
        headers,
      });
      if (!res.ok) throw new Error(`HTTP ${res.status} ${res.statusText}`);
      const data = (await res.json()) as GetPetResponse['data'];
      return {
        data,
        status: res.status,
        statusText: res.statusText,
        headers: Object.fromEntries(res.headers.entries()),
      };
    }
    "#);
}

#[test]
fn test_fetch_json_body() {
    let ops = ops();
    let out = FetchEmitter
        .emit_implementation(&ops[1], &GenerationOptions::default())
        .unwrap();
    assert!(out.contains("  const url = `${API_BASE_URL}/pets`;"));
    assert!(out.contains("  headers['Content-Type'] = 'application/json';"));
    assert!(out.contains("    body: JSON.stringify(params.body),"));
    assert!(!out.contains("FormData"));
}

#[test]
fn test_axios_implementation_with_jsdoc() {
    let ops = ops();
    let options = GenerationOptions {
        include_comments: false,
        include_jsdoc: true,
        ..GenerationOptions::default()
    };
    let out = AxiosEmitter.emit_implementation(&ops[1], &options).unwrap();
    insta::assert_snapshot!(out, @r#"
    /**
     * Add a pet
     *
     * @param params - CreatePetRequest
     * @returns CreatePetResponse
     */
    export async function createPet(params: CreatePetRequest): Promise<CreatePetResponse> {
      const headers: Record<string, string> = {};
      if (params.headers) Object.assign(headers, params.headers);
      const res = await api.request<CreatePetResponse['data']>({
        method: 'POST',
        url: `/pets`,
        headers,
        data: params.body,
      });
      return {
        data: res.data,
        status: res.status,
        statusText: res.statusText,
        headers: Object.fromEntries(Object.entries(res.headers).map(([key, value]) => [key, String(value)])),
      };
    }
    "#);
}

#[test]
fn test_ky_multipart_implementation() {
    let ops = ops();
    let out = KyEmitter
        .emit_implementation(&ops[2], &GenerationOptions::default())
        .unwrap();
    insta::assert_snapshot!(out, @r#"
    // PUT /pets/{id}/photo
    export async function putPetsIdPhoto(params: PutPetsIdPhotoRequest): Promise<PutPetsIdPhotoResponse> {
      const headers: Record<string, string> = {};
      if (params.headers?.xTraceId !== undefined) headers['X-Trace-Id'] = String(params.headers?.xTraceId);
      const form = new FormData();
      if (params.formData?.file !== undefined) form.append('file', params.formData?.file);
      if (params.formData?.caption !== undefined) form.append('caption', String(params.formData?.caption));
      const res = await api(`pets/${encodeURIComponent(String(params.id))}/photo`, {
        method: 'put',
        headers,
        body: form,
      });
      const data = undefined;
      return {
        data,
        status: res.status,
        statusText: res.statusText,
        headers: Object.fromEntries(res.headers.entries()),
      };
    }
    "#);
}

#[test]
fn test_ky_comma_joins_query_arrays() {
    let ops = ops();
    let out = KyEmitter
        .emit_implementation(&ops[0], &GenerationOptions::default())
        .unwrap();
    assert!(out.contains("searchParams.append(key, value.map(String).join(','))"));
    assert!(out.contains("    searchParams,\n"));
    assert!(out.contains("await res.json<GetPetResponse['data']>()"));
}

#[test]
fn test_superagent_implementation() {
    let ops = ops();
    let options = GenerationOptions::default();
    let get = SuperagentEmitter.emit_implementation(&ops[0], &options).unwrap();
    assert!(get.contains(
        "  const req = request('GET', `${API_BASE_URL}/pets/${encodeURIComponent(String(params.id))}`);"
    ));
    assert!(get.contains("if (value !== undefined && value !== null) req.query({ [key]: value });"));
    assert!(get.contains("  req.set(headers);"));
    assert!(get.contains("    data: res.body as GetPetResponse['data'],"));

    let upload = SuperagentEmitter.emit_implementation(&ops[2], &options).unwrap();
    assert!(upload.contains(
        "  if (params.formData?.file !== undefined) req.attach('file', params.formData?.file);"
    ));
    assert!(upload.contains(
        "  if (params.formData?.caption !== undefined) req.field('caption', String(params.formData?.caption));"
    ));
}

#[test]
fn test_config_section() {
    let options = GenerationOptions::default();
    let fetch = FetchEmitter.emit_config(&options);
    assert!(fetch.starts_with("// API configuration\n"));
    assert!(fetch.ends_with("})();"));

    let quiet = GenerationOptions {
        include_comments: false,
        ..options
    };
    assert!(FetchEmitter.emit_config(&quiet).starts_with("const API_BASE_URL: string = (() => {"));
    assert!(
        AxiosEmitter
            .emit_config(&quiet)
            .ends_with("})();\n\nconst api = axios.create({\n  baseURL: API_BASE_URL,\n});")
    );
    assert!(KyEmitter.emit_config(&quiet).contains("prefixUrl: API_BASE_URL"));
}

#[test]
fn test_query_array_styles() {
    assert_eq!(FetchEmitter.query_array_style(), QueryArrayStyle::Repeat);
    assert_eq!(AxiosEmitter.query_array_style(), QueryArrayStyle::Brackets);
    assert_eq!(KyEmitter.query_array_style(), QueryArrayStyle::Comma);
    assert_eq!(SuperagentEmitter.query_array_style(), QueryArrayStyle::Repeat);
    assert_eq!(QueryArrayStyle::Brackets.example(), "k[]=a&k[]=b");
}

#[test]
fn test_full_source_layout() {
    let ops = ops();
    let options = GenerationOptions {
        export_as_default: true,
        ..GenerationOptions::default()
    };
    let source = FetchEmitter.emit_full_source(&ops, &options).unwrap();

    assert!(source.starts_with("// Generated with fetch\n\n// API configuration\n"));
    assert!(source.ends_with("\n\nexport default { getPet, createPet, putPetsIdPhoto };\n"));

    let pet = source
        .find("export interface Pet {\n  name: string;\n  tags?: string[];\n}")
        .unwrap();
    let request = source.find("export interface GetPetRequest {").unwrap();
    let response = source.find("export interface GetPetResponse {").unwrap();
    let implementation = source.find("export async function getPet(").unwrap();
    assert!(pet < request && request < response && response < implementation);
    assert_eq!(source.matches("export async function").count(), 3);
    assert!(!source.contains("\n\n\n"));
}

#[test]
fn test_duplicate_interface_names_keep_first() {
    let mut ops = ops();
    ops.truncate(2);
    ops[1].operation_id = Some("getPet".into());
    let source = FetchEmitter
        .emit_full_source(&ops, &GenerationOptions::default())
        .unwrap();

    assert_eq!(source.matches("export interface GetPetRequest {").count(), 1);
    assert_eq!(source.matches("export interface GetPetResponse {").count(), 1);
    // the first declaration is the one kept
    assert!(source.contains("  query?: {\n    verbose?: boolean;\n  };"));
    assert!(!source.contains("  body: Pet;"));
    assert_eq!(source.matches("(params: GetPetRequest)").count(), 2);
}

#[test]
fn test_pascal_case_function_names() {
    let ops = ops();
    let options = GenerationOptions {
        function_name_case: swagen_core::transform::naming::NameCase::PascalCase,
        ..GenerationOptions::default()
    };
    let (function, interface) = operation_names(&ops[2], &options);
    assert_eq!(function, "PutPetsIdPhoto");
    assert_eq!(interface, "PutPetsIdPhoto");
}

const SEARCH: &str = r#"
openapi: 3.0.0
info:
  title: Search
  version: 1.0
paths:
  /search/{query}:
    get:
      operationId: search
      parameters:
        - { name: query, in: path, required: true, schema: { type: string } }
        - { name: limit, in: query, schema: { type: integer } }
        - { name: page_size, in: query, schema: { type: integer } }
        - { name: pageSize, in: query, schema: { type: integer } }
      responses:
        "204":
          description: none
"#;

fn search() -> CanonicalOperation {
    let value = parse::from_yaml(SEARCH).unwrap();
    normalize(&RawDocument::from_value(value).unwrap())
        .unwrap()
        .remove(0)
}

#[test]
fn test_path_parameter_named_like_a_group() {
    let op = search();
    let options = GenerationOptions::default();
    insta::assert_snapshot!(FetchEmitter.emit_request_type(&op, &options), @r"
    export interface SearchRequest {
      queryParam: string;
      query?: {
        limit?: number;
        pageSize?: number;
        pageSize2?: number;
      };
      headers?: Record<string, string>;
    }
    ");

    let out = FetchEmitter.emit_implementation(&op, &options).unwrap();
    assert!(out.contains(
        "  let url = `${API_BASE_URL}/search/${encodeURIComponent(String(params.queryParam))}`;"
    ));
    assert!(out.contains("    'limit': params.query?.limit,\n"));
    assert!(out.contains("    'page_size': params.query?.pageSize,\n"));
    assert!(out.contains("    'pageSize': params.query?.pageSize2,\n"));
}
