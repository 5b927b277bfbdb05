//! Runtime configuration of the navigation channel.
//!
//! ```
//! use web_component_utils::{config::RouterConfig, router::SearchParamsHandling};
//!
//! let config: RouterConfig = serde_json::from_str(r#"{ "search_params_handling": "preserve" }"#).unwrap();
//! assert_eq!(config.search_params_handling, SearchParamsHandling::Preserve);
//! assert_eq!(config.redirect_param, "redirect");
//! ```

use crate::router::SearchParamsHandling;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
	/// How [`NavigationChannel::navigate`](`crate::router::NavigationChannel::navigate`) treats the current query.
	pub search_params_handling: SearchParamsHandling,

	/// The query parameter [`NavigationChannel::redirect`](`crate::router::NavigationChannel::redirect`) stores the origin path in,
	/// unless another one is given.
	pub redirect_param: String,
}
impl Default for RouterConfig {
	fn default() -> Self {
		Self {
			search_params_handling: SearchParamsHandling::default(),
			redirect_param: "redirect".to_owned(),
		}
	}
}
