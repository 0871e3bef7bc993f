use std::path::Path;
use std::str::FromStr;

use ini::{Ini, Properties};
use thiserror::Error;

use crate::alg;
use crate::components::chain;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] ini::ParseError),

    #[error("missing section \"{0}\"")]
    MissingSection(String),

    #[error("invalid value \"{value}\" for setting \"{key}\"")]
    InvalidValue {
        key: String,
        value: String,
    },
}

pub fn load<P: AsRef<Path>>(path: P) -> Result<Ini, Error> {
    match Ini::load_from_file(path) {
        Ok(ini) => Ok(ini),
        Err(ini::Error::Io(err)) => Err(Error::Io(err)),
        Err(ini::Error::Parse(err)) => Err(Error::Parse(err)),
    }
}

pub fn parse(text: &str) -> Result<Ini, Error> {
    Ok(Ini::load_from_str(text)?)
}

fn invalid(key: &str, value: &str) -> Error {
    Error::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

// Absent keys leave the target untouched
fn read<T: FromStr>(
    props: &Properties,
    key: &str,
    target: &mut T,
) -> Result<(), Error> {
    if let Some(value) = props.get(key) {
        *target = value.trim().parse()
            .map_err(|_| invalid(key, value))?;
    }

    Ok(())
}

/// Vectors are written as "x, y, z"
fn read_vec(
    props: &Properties,
    key: &str,
    target: &mut alg::Vec3,
) -> Result<(), Error> {
    let value = match props.get(key) {
        Some(value) => value,
        None => return Ok(()),
    };

    let components = value.split(',')
        .map(|component| component.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid(key, value))?;

    match components.as_slice() {
        [x, y, z] => *target = alg::Vec3::new(*x, *y, *z),
        _ => return Err(invalid(key, value)),
    }

    Ok(())
}

fn read_collision(
    props: &Properties,
    key: &str,
    target: &mut chain::CollisionMode,
) -> Result<(), Error> {
    if let Some(value) = props.get(key) {
        *target = match value.trim().to_lowercase().as_str() {
            "none" | "off" => chain::CollisionMode::None,
            "query" | "on" => chain::CollisionMode::Query,
            _ => return Err(invalid(key, value)),
        };
    }

    Ok(())
}

/// Build chain settings from a config section, starting from the defaults
pub fn chain_settings(ini: &Ini, section: &str) -> Result<chain::Settings, Error> {
    let props = ini.section(Some(section))
        .ok_or_else(|| Error::MissingSection(section.to_string()))?;

    let mut settings = chain::Settings::default();

    read(props, "segments", &mut settings.segments)?;
    read(props, "chain_length", &mut settings.chain_length)?;
    read_vec(props, "scale", &mut settings.scale)?;
    read_vec(props, "additive_rotation", &mut settings.additive_rotation)?;

    read(props, "is_local", &mut settings.is_local)?;
    read_vec(props, "end_point", &mut settings.end_point)?;
    read(props, "attach_start", &mut settings.attach_start.enabled)?;
    read(props, "attach_end", &mut settings.attach_end.enabled)?;

    read(props, "gravity", &mut settings.gravity)?;
    read(props, "damping", &mut settings.damping)?;
    read(props, "stiffness", &mut settings.stiffness)?;
    read(props, "friction", &mut settings.friction)?;

    read_collision(props, "collision", &mut settings.collision)?;
    read(props, "chain_width", &mut settings.chain_width)?;
    read(props, "object_type", &mut settings.filter.object_type)?;
    read(props, "responds_to", &mut settings.filter.responds_to)?;

    read(props, "self_collision", &mut settings.self_collision)?;
    read(props, "self_collision_width", &mut settings.self_collision_width)?;
    read(props, "self_collision_threshold", &mut settings.self_collision_threshold)?;

    read(props, "skip", &mut settings.skip)?;
    read(props, "draw_debug", &mut settings.draw_debug)?;
    read(props, "sound_threshold", &mut settings.sound_threshold)?;
    read(props, "sound_skip", &mut settings.sound_skip)?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_section_keeps_defaults() {
        let ini = parse(
            "[rope]\n\
            segments = 24\n\
            end_point = 0, 0, -300\n\
            collision = none\n\
            self_collision = true\n"
        ).unwrap();

        let settings = chain_settings(&ini, "rope").unwrap();

        assert_eq!(settings.segments, 24);
        assert!(settings.end_point == alg::Vec3::new(0., 0., -300.));
        assert_eq!(settings.collision, chain::CollisionMode::None);
        assert!(settings.self_collision);

        // Untouched
        assert_eq!(settings.stiffness, 10);
        assert!((settings.chain_length - 1.5).abs() < 0.0001);
        assert!(settings.attach_start.enabled);
    }

    #[test]
    fn missing_section() {
        let ini = parse("[rope]\nsegments = 4\n").unwrap();

        match chain_settings(&ini, "cable") {
            Err(Error::MissingSection(name)) => assert_eq!(name, "cable"),
            other => panic!("Unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn invalid_values() {
        let bad_number = parse("[rope]\nstiffness = lots\n").unwrap();

        match chain_settings(&bad_number, "rope") {
            Err(Error::InvalidValue { key, value }) => {
                assert_eq!(key, "stiffness");
                assert_eq!(value, "lots");
            }

            other => panic!("Unexpected result: {:?}", other.map(|_| ())),
        }

        let short_vector = parse("[rope]\nscale = 1, 2\n").unwrap();
        assert!(chain_settings(&short_vector, "rope").is_err());

        let bad_mode = parse("[rope]\ncollision = sometimes\n").unwrap();
        assert!(chain_settings(&bad_mode, "rope").is_err());
    }

    #[test]
    fn missing_file() {
        match load("definitely/not/here.ini") {
            Err(Error::Io(_)) => (),
            other => panic!("Unexpected result: {:?}", other.map(|_| ())),
        }
    }
}
