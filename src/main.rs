use anyhow::Context;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use lampbot::app::LampPlugin;
use lampbot::config::Config;

fn main() -> anyhow::Result<()> {
    lampbot::util::enable_tracing();

    let config = match std::env::args_os().nth(1) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("loading {}", path.to_string_lossy()))?,
        None => Config::default(),
    };

    App::new()
        .insert_resource(WindowDescriptor {
            title: String::from("Lampbot"),
            ..default()
        })
        .add_plugins_with(DefaultPlugins, |group| group.disable::<LogPlugin>())
        .add_plugin(LampPlugin::new(config))
        .run();

    Ok(())
}
