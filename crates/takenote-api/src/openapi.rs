//! OpenAPI document served by Swagger UI in debug mode.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use takenote_core::{
    CategoryResult, CreateNoteRequest, ErrorResponse, Note, NoteAnalysis, NoteListResponse,
    ScoredLabel, SearchNotesRequest, SemanticHit, SemanticSearchRequest, SemanticSearchResponse,
    SuccessResponse, SummaryResult, TagResult, UpdateNoteRequest, UserInfo,
};

use crate::handlers::{ai, notes, system};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Take Note Backend API",
        description = "Backend API for the Take Note mobile application"
    ),
    paths(
        system::root,
        system::health_check,
        system::me,
        notes::list_notes,
        notes::create_note,
        notes::search_notes,
        notes::get_note,
        notes::update_note,
        notes::delete_note,
        notes::restore_note,
        notes::toggle_pin,
        ai::summarize_note,
        ai::tag_note,
        ai::categorize_note,
        ai::process_note,
        ai::semantic_search,
    ),
    components(schemas(
        Note,
        CreateNoteRequest,
        UpdateNoteRequest,
        SearchNotesRequest,
        NoteListResponse,
        SuccessResponse,
        ErrorResponse,
        UserInfo,
        ScoredLabel,
        SummaryResult,
        TagResult,
        CategoryResult,
        NoteAnalysis,
        SemanticSearchRequest,
        SemanticHit,
        SemanticSearchResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "Notes", description = "Note CRUD operations"),
        (name = "AI", description = "Summaries, tags, categories and semantic search"),
        (name = "System", description = "Health checks and service info")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` security scheme referenced by the note routes.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_routes_and_bearer_scheme() {
        let doc = ApiDoc::openapi();
        for path in ["/notes", "/notes/{id}", "/notes/{id}/pin", "/notes/ai/search", "/health"] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer"));
        assert!(components.schemas.contains_key("Note"));
    }
}
