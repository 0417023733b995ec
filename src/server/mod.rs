/*!
 * HTTP surface of the translation service.
 *
 * - `routes`: Router construction and middleware
 * - `handlers`: Request handlers (buffered, streaming, health, downloads)
 * - `dto`: Request and response bodies
 * - `error`: Error to HTTP response mapping
 * - `state`: Shared handler state
 */

pub use self::error::HttpError;
pub use self::routes::create_router;
pub use self::state::AppState;

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
