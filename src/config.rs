// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;

use crate::error::Fallible;

/// Name of the optional configuration file in a collection directory.
pub const CONFIG_FILE: &str = "snapswipe.toml";

/// Collection settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Port the swipe session is served on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// How many cards of the stack are drawn.
    #[serde(default = "default_max_visible")]
    pub max_visible: usize,
    /// Whether to open a browser when a session starts.
    #[serde(default = "default_open_browser")]
    pub open_browser: bool,
}

fn default_port() -> u16 {
    8000
}

fn default_max_visible() -> usize {
    2
}

fn default_open_browser() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            max_visible: default_max_visible(),
            open_browser: default_open_browser(),
        }
    }
}

impl Config {
    /// Read the configuration of the collection at `directory`, falling back
    /// to the defaults if there is no configuration file.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(CONFIG_FILE);
        if !path.exists() {
            log::debug!("No configuration file, using defaults.");
            return Ok(Self::default());
        }
        let content = read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        log::debug!("Loaded configuration: {config:?}");
        Ok(config)
    }
}
