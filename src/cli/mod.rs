//! # CLI Module
//!
//! Command-line front end for the generator.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Generate the document of one server and write it as
//! `{server}_openapi.{yaml|json}`:
//!
//! ```bash
//! jsonapi-openapi generate v1 --manifest routes.yaml
//! jsonapi-openapi generate v1 json --config openapi.toml --output-dir public/docs
//! ```
//!
//! Options:
//! - `--manifest <FILE>` - Route table and server manifest (default: `routes.yaml`)
//! - `--config <FILE>` - Generator configuration (default: `openapi.toml` next to the manifest)
//! - `--output-dir <DIR>` - Output directory (default: `JSONAPI_OAS_OUTPUT_DIR` or `storage/app`)
//!
//! When the generated document fails validation every issue is printed,
//! grouped by location, nothing is written and the process exits with 1.
//!
//! ### `routes`
//!
//! Print how each route of a server is classified:
//!
//! ```bash
//! jsonapi-openapi routes v1 --manifest routes.yaml
//! ```

mod commands;


pub use commands::{run, run_cli, Cli, Commands, DEFAULT_MANIFEST};
