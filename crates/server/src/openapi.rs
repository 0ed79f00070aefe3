use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// `jobseeker` (default) or `company`
    pub role: Option<String>,
}

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct TokenResponse { pub token: String }

#[derive(ToSchema)]
pub struct UserPatchDoc {
    pub name: Option<String>,
    pub email: Option<String>,
    /// `null` clears the resume
    pub resume: Option<String>,
}

#[derive(ToSchema)]
pub struct NewCompanyRequest {
    pub name: String,
    pub description: String,
    pub industry: String,
    pub website: String,
    pub logo: Option<String>,
}

#[derive(ToSchema)]
pub struct CompanyPatchDoc {
    pub name: Option<String>,
    pub description: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    /// `null` clears the logo
    pub logo: Option<String>,
}

#[derive(ToSchema)]
pub struct NewJobRequest {
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub salary: Option<String>,
    pub location: Option<String>,
}

#[derive(ToSchema)]
pub struct JobPatchDoc {
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub salary: Option<String>,
    pub location: Option<String>,
}

#[derive(utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct JobSearchParams {
    /// Substring of the title, case-insensitive
    pub keyword: Option<String>,
    /// Substring of the location, case-insensitive
    pub location: Option<String>,
    /// Owning company's industry
    pub industry: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::users::me,
        crate::routes::users::update_me,
        crate::routes::users::delete_me,
        crate::routes::users::applied_jobs,
        crate::routes::users::get_user,
        crate::routes::users::apply,
        crate::routes::users::withdraw,
        crate::routes::companies::list,
        crate::routes::companies::create,
        crate::routes::companies::me,
        crate::routes::companies::update_me,
        crate::routes::companies::delete_me,
        crate::routes::companies::get,
        crate::routes::companies::jobs,
        crate::routes::jobs::list,
        crate::routes::jobs::search,
        crate::routes::jobs::get,
        crate::routes::jobs::similar,
        crate::routes::jobs::create,
        crate::routes::jobs::update,
        crate::routes::jobs::delete,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            TokenResponse,
            UserPatchDoc,
            NewCompanyRequest,
            CompanyPatchDoc,
            NewJobRequest,
            JobPatchDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "users"),
        (name = "companies"),
        (name = "jobs")
    )
)]
pub struct ApiDoc;
