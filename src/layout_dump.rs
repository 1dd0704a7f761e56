use crate::layout::{Floorplan, Resolution};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub divisions: Vec<DivisionDump>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlaps: Option<Vec<[String; 2]>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<ResolutionDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DivisionDump {
    pub id: String,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub overridden: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionDump {
    pub iterations: usize,
    pub converged: bool,
    pub remaining_overlaps: usize,
}

impl From<&Resolution> for ResolutionDump {
    fn from(resolution: &Resolution) -> Self {
        Self {
            iterations: resolution.iterations,
            converged: resolution.converged,
            remaining_overlaps: resolution.remaining_overlaps,
        }
    }
}

impl LayoutDump {
    pub fn from_floorplan(
        plan: &Floorplan,
        resolution: Option<&Resolution>,
        include_overlaps: bool,
    ) -> Self {
        let divisions = plan
            .divisions()
            .iter()
            .map(|division| {
                let rect = crate::layout::effective_rect(division, plan.positions());
                DivisionDump {
                    id: division.id.clone(),
                    name: division.name.clone(),
                    x: rect.x,
                    y: rect.y,
                    width: rect.width,
                    height: rect.height,
                    overridden: plan.is_overridden(&division.id),
                }
            })
            .collect();

        let overlaps = include_overlaps.then(|| {
            plan.overlapping_pairs()
                .into_iter()
                .map(|(a, b)| [a, b])
                .collect()
        });

        LayoutDump {
            divisions,
            overlaps,
            resolution: resolution.map(ResolutionDump::from),
        }
    }
}

/// Writes the dump as JSON to `path`, or stdout when `None`.
pub fn write_layout_dump(
    dump: &LayoutDump,
    path: Option<&Path>,
    pretty: bool,
) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_json(&mut writer, dump, pretty)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_json(&mut writer, dump, pretty)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

fn write_json<W: Write>(writer: &mut W, dump: &LayoutDump, pretty: bool) -> anyhow::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, dump)?;
    } else {
        serde_json::to_writer(writer, dump)?;
    }
    Ok(())
}
