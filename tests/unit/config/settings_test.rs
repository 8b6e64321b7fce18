// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use keyqueue::config::settings::Settings;

#[test]
fn test_config_loading_from_default_toml() {
    let settings = Settings::new().expect("Failed to load configuration");

    assert!(settings.queue.registry_capacity > 0);
    assert!(!settings.telemetry.filter.is_empty());
    assert!(!settings.demo.key.is_empty());
}
