#![cfg_attr(docsrs, feature(doc_cfg))]
//! High level VOEvent facade that re-exports the workspace crates.
//!
//! ```rust
//! use voevent::{xml::Path, Voevent};
//!
//! let packet: Voevent = r#"<voe:VOEvent xmlns:voe="http://www.ivoa.net/xml/VOEvent/v2.0"
//!         ivorn="ivo://example/test#1" role="test" version="2.0">
//!     <Why><Inference><Name>GRB121212A</Name></Inference></Why>
//!     <What>
//!         <Group name="source_flux">
//!             <Param name="peak_flux" value="12.3" unit="mJy"/>
//!             <Param name="int_flux" value="45.6" unit="mJy"/>
//!         </Group>
//!     </What>
//! </voe:VOEvent>"#
//!     .parse()?;
//! assert_eq!(packet.inference_names(), ["GRB121212A"]);
//!
//! let what = packet.flatten_what();
//! let peak = what.param("source_flux", "peak_flux").expect("peak flux");
//! assert_eq!(peak.value.as_deref(), Some("12.3"));
//!
//! let path: Path = ".//Param[@name='int_flux']".parse().expect("valid path");
//! let int_flux = packet.root().find_first(&path).expect("int flux");
//! assert_eq!(int_flux.attribute("value")?, "45.6");
//! # Ok::<(), voevent::CoreError>(())
//! ```

pub use voevent_core as packet;
pub use voevent_xml as xml;

pub use voevent_core::{flatten_what, CoreError, FlattenedWhat, ParamEntry, Voevent};
pub use voevent_xml::{load, serialize, Node, ParseError, Path};
