/*!
# UniResult

A result-sheet generator for university marksheets, built in Rust.

## Overview

This project is a migration of an existing browser-based result-sheet
application to Rust. The user enters student details and per-subject marks,
the application computes the aggregate percentage and pass/fail status,
renders a formatted statement of marks, and persists generated results to a
local history file with an optional best-effort mirror to a remote service.

## Architecture

The application follows a library-plus-frontends structure:

### Library Core
- **Domain Model** - Subject, StudentInfo, ResultData and the closed set of
  result statuses, with a JSON wire format shared with the remote service
- **Scoring Engine** - pure functions for percentage computation, grade-band
  classification and the per-subject pass rule
- **Result Store** - CRUD over a single JSON history collection behind a
  swappable storage backend
- **Remote Mirror** - a single, non-retried `POST /submit` of a result to a
  configured endpoint

### Frontends
- **Web API** - axum server exposing generate / save / history / delete
- **Terminal client** - interactive entry of a marksheet from the console

### Data Persistence Layer
- One JSON array of results under `database/history.json` (configurable)
- Atomic replace on every write (temp file + rename)
- Unreadable or missing history is treated as empty, never as an error

## Modules

- **model**: domain types and their JSON encoding
- **scoring**: percentage, classification and form-validity rules
- **store**: local history persistence
- **remote**: best-effort remote mirror client (requires the `web` feature)
- **report**: plain-text marksheet rendering and CSV history export
- **app**: routing and handlers (requires the `web` feature)

## REST API Endpoints

- `GET /` - health check
- `POST /api/generate` - validate a form and produce a result snapshot
- `POST /api/results` - persist a result locally, mirroring it remotely
- `GET /api/results` - list saved results with recomputed status
- `GET /api/results/{id}` - fetch one saved result with its marksheet
- `DELETE /api/results/{id}` - delete a saved result
*/

// Re-export all modules so they appear in the documentation
#[cfg(feature = "web")]
pub mod app;
pub mod model;
#[cfg(feature = "web")]
pub mod remote;
pub mod report;
pub mod scoring;
pub mod store;

/// Re-export everything from these modules to make it easier to use
pub use model::*;
pub use report::*;
pub use scoring::*;
pub use store::*;
