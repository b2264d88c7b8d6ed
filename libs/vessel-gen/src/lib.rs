//! # Vessel Generators
//!
//! Parameter tables and assembly sequences for the vessel family, built on
//! [`loft_mesh`]. Every generator takes an immutable config whose
//! `Default` is the production table, stitches one or more meshes and
//! returns [`ObjectRecord`]s ready for [`write_records`].
//!
//! | Vessel | Profile | Ends | Extras |
//! |--------|---------|------|--------|
//! | [`cup`](generators::cup) | circles, rounded squares | quad caps | vertical resampling, image relief |
//! | [`bowl`](generators::bowl) | open B-spline | poles | data-curve band |
//! | [`plate`](generators::plate) | open B-spline | ellipse caps | embossed image |
//! | [`pot`](generators::pot) | nose outline, ellipse opening | quad caps | culled window, welded spout |
//! | [`pot_lid`](generators::pot_lid) | pot outline | quad cap | welded knob |
//! | [`sauce_dish`](generators::sauce_dish) | rounded rectangles | quad caps | solidified wall |
//! | [`spoon`](generators::spoon) | data-curve ellipses, open handle arcs | quad cap | solidified, sealed handle |
//!
//! ## Usage
//!
//! ```rust
//! use vessel_gen::generators::sauce_dish::{self, SauceDishConfig};
//!
//! let config = SauceDishConfig { subdivide_x: 1, subdivide_y: 0, ..Default::default() };
//! let records = sauce_dish::generate(&config)?;
//! let json = vessel_gen::to_json(&records)?;
//! assert!(json.contains("\"flipFaces\""));
//! # Ok::<(), vessel_gen::GenError>(())
//! ```

pub mod error;
pub mod generators;
pub mod record;

pub use error::{GenError, GenResult};
pub use record::{to_json, write_records, write_records_to_path, ObjectRecord};
