//! The three side-effect directives.
//!
//! Each is constructed against a [`Part`](`crate::directive::Part`) and then driven through a [`Binding`](`crate::directive::Binding`):
//!
//! ```
//! use web_component_utils::{
//! 	directive::{Binding, Part},
//! 	directives::link::{Link, LinkOptions},
//! 	dom::{memory::MemoryDom, Dom},
//! 	history::MemoryHistory,
//! 	router::NavigationChannel,
//! };
//!
//! let dom = MemoryDom::new();
//! let channel = NavigationChannel::new(MemoryHistory::new("https://example.com/").unwrap());
//! let button = dom.create_element("button");
//!
//! let part = Part::element(button);
//! let link = Link::new(dom.clone(), channel.clone(), &part).unwrap();
//! let mut binding = Binding::new(part, link);
//! binding.render((Some("/home".to_owned()), LinkOptions::default()));
//!
//! assert_eq!(dom.get_attribute(&button, "data-href").as_deref(), Some("/home"));
//! dom.click(button);
//! assert_eq!(channel.current_path(), "/home");
//! ```

pub mod link;
pub mod route_active;
pub mod slot_filled;
