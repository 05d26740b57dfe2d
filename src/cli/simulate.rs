use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{buffer::Buffer, layout::Rect, text::Line};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::DialogSettings;
use crate::tui::components::dialogs::{
    DialogBody, DialogConfig, DialogControl, DialogEvent, DialogHost, DialogId, DialogRegistry,
    DialogVariant, OpenOptions,
};
use crate::tui::themes::Theme;

/// Run a scripted dialog scenario without a terminal
#[derive(Args)]
pub struct SimulateCommand {
    /// Steps separated by `;` or newlines, e.g. "mount d1; open d1; wait 200; esc d1"
    #[arg(short = 's', long = "script")]
    pub script: String,

    /// Width of the virtual screen used for pointer hit testing
    #[arg(long = "width", default_value_t = 80)]
    pub width: u16,

    /// Height of the virtual screen used for pointer hit testing
    #[arg(long = "height", default_value_t = 24)]
    pub height: u16,
}

impl SimulateCommand {
    pub async fn execute(&self, settings: &DialogSettings) -> Result<()> {
        let steps = parse_script(&self.script)?;
        info!("Simulating {} steps", steps.len());

        let area = Rect::new(0, 0, self.width, self.height);
        for line in run_script(settings.dialog_config(), &steps, area).await? {
            println!("{}", serde_json::to_string(&line)?);
        }
        Ok(())
    }
}

/// One scripted action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Mount a dialog, optionally as a sheet with the given snap points
    Mount { id: String, snap_points: Option<Vec<u16>> },
    Unmount(String),
    Open { id: String, index: Option<usize> },
    Close(String),
    /// Escape key press delivered to one dialog
    Esc(String),
    /// Left button press delivered to one dialog
    Click { id: String, column: u16, row: u16 },
    Wait(Duration),
}

pub fn parse_script(script: &str) -> Result<Vec<Step>> {
    script
        .split(|c| c == ';' || c == '\n')
        .map(str::trim)
        .filter(|step| !step.is_empty())
        .enumerate()
        .map(|(number, step)| {
            parse_step(step).with_context(|| format!("step {} ({:?})", number + 1, step))
        })
        .collect()
}

fn parse_step(step: &str) -> Result<Step> {
    let words: Vec<&str> = step.split_whitespace().collect();
    let id = |index: usize| -> Result<String> {
        words
            .get(index)
            .map(|id| id.to_string())
            .ok_or_else(|| anyhow!("missing dialog id"))
    };
    let number = |index: usize, name: &str| -> Result<u64> {
        let word = words
            .get(index)
            .ok_or_else(|| anyhow!("missing {}", name))?;
        word.parse()
            .map_err(|_| anyhow!("invalid {}: {}", name, word))
    };
    let expect_len = |len: usize| -> Result<()> {
        if words.len() > len {
            bail!("unexpected argument: {}", words[len]);
        }
        Ok(())
    };

    let parsed = match words[0] {
        "mount" => {
            let snap_points = match words.get(2) {
                None => None,
                Some(&"sheet") => {
                    let points = words[3..]
                        .iter()
                        .map(|point| {
                            point
                                .parse::<u16>()
                                .map_err(|_| anyhow!("invalid snap point: {}", point))
                        })
                        .collect::<Result<Vec<_>>>()?;
                    Some(if points.is_empty() { vec![50, 90] } else { points })
                }
                Some(other) => bail!("unexpected argument: {}", other),
            };
            return Ok(Step::Mount { id: id(1)?, snap_points });
        }
        "unmount" => Step::Unmount(id(1)?),
        "open" => {
            let index = match words.get(2) {
                Some(_) => Some(number(2, "snap index")? as usize),
                None => None,
            };
            expect_len(3)?;
            return Ok(Step::Open { id: id(1)?, index });
        }
        "close" => Step::Close(id(1)?),
        "esc" => Step::Esc(id(1)?),
        "click" => {
            expect_len(4)?;
            return Ok(Step::Click {
                id: id(1)?,
                column: u16::try_from(number(2, "column")?)?,
                row: u16::try_from(number(3, "row")?)?,
            });
        }
        "wait" => {
            expect_len(2)?;
            return Ok(Step::Wait(Duration::from_millis(number(1, "duration")?)));
        }
        other => bail!("unknown step: {}", other),
    };
    expect_len(2)?;
    Ok(parsed)
}

/// Drive dialogs through `steps` and collect every emitted event, stamped
/// with the milliseconds elapsed since the script started
pub async fn run_script(config: DialogConfig, steps: &[Step], area: Rect) -> Result<Vec<Value>> {
    let started = Instant::now();
    let (sender, mut receiver) = mpsc::unbounded_channel::<DialogEvent>();
    let collector = tokio::spawn(async move {
        let mut lines = Vec::new();
        while let Some(event) = receiver.recv().await {
            lines.push(stamp(started.elapsed(), &event)?);
        }
        Ok::<_, anyhow::Error>(lines)
    });

    let mut simulation = Simulation::new(config, area);
    simulation.host.set_event_sender(sender);
    for step in steps {
        simulation.apply(step).await?;
    }
    drop(simulation);

    collector.await?
}

fn stamp(elapsed: Duration, event: &DialogEvent) -> Result<Value> {
    let mut value = serde_json::to_value(event)?;
    if let Value::Object(map) = &mut value {
        map.insert("at_ms".to_string(), Value::from(elapsed.as_millis() as u64));
    }
    Ok(value)
}

struct Simulation {
    host: DialogHost,
    controls: HashMap<String, DialogControl>,
    config: DialogConfig,
    area: Rect,
    theme: Theme,
    buffer: Buffer,
}

impl Simulation {
    fn new(config: DialogConfig, area: Rect) -> Self {
        Self {
            host: DialogHost::new(DialogRegistry::new()),
            controls: HashMap::new(),
            config,
            area,
            theme: Theme::default(),
            buffer: Buffer::empty(area),
        }
    }

    /// Controls outlive their mounts, so steps may target unmounted dialogs
    fn control(&mut self, id: &str) -> DialogControl {
        self.controls
            .entry(id.to_string())
            .or_insert_with(|| DialogControl::with_id(id))
            .clone()
    }

    async fn apply(&mut self, step: &Step) -> Result<()> {
        debug!(?step, "applying step");
        match step {
            Step::Mount { id, snap_points } => {
                let control = self.control(id);
                let mut config = self.config.clone().with_title(id.as_str());
                if let Some(snap_points) = snap_points {
                    config = config.with_variant(DialogVariant::Sheet {
                        snap_points: snap_points.clone(),
                    });
                }
                let body = DialogBody::new(vec![Line::from(format!("Dialog {}", id))])
                    .with_actions(vec!["Cancel".to_string(), "Ok".to_string()]);
                self.host.mount(&control, config, body)?;
            }
            Step::Unmount(id) => self.host.unmount(&DialogId::new(id.as_str()))?,
            Step::Open { id, index } => self.control(id).open_with(OpenOptions { index: *index }),
            Step::Close(id) => self.control(id).close(),
            Step::Esc(id) => {
                let key = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
                if let Some(controller) = self.host.controller(&DialogId::new(id.as_str())) {
                    controller.handle_key_event(&key);
                }
            }
            Step::Click { id, column, row } => {
                // lay out the current frame so hit areas are up to date
                self.host
                    .render_to_buffer(&mut self.buffer, self.area, &self.theme);
                let press = MouseEvent {
                    kind: MouseEventKind::Down(MouseButton::Left),
                    column: *column,
                    row: *row,
                    modifiers: KeyModifiers::NONE,
                };
                let id = DialogId::new(id.as_str());
                let topmost = self.host.topmost().map(|controller| controller.id() == &id);
                if topmost == Some(true) {
                    self.host.handle_mouse_event(&press);
                } else if let Some(controller) = self.host.controller(&id) {
                    controller.handle_mouse_event(&press);
                }
            }
            Step::Wait(duration) => tokio::time::sleep(*duration).await,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(lines: &[Value]) -> Vec<(u64, String)> {
        lines
            .iter()
            .map(|line| {
                let at = line["at_ms"].as_u64().unwrap();
                let name = match line["event"].as_str().unwrap() {
                    "state_changed" => format!("{}->{}", line["from"], line["to"]).replace('"', ""),
                    other => other.to_string(),
                };
                (at, name)
            })
            .collect()
    }

    #[test]
    fn test_parse_script() {
        let steps =
            parse_script("mount d1; mount d2 sheet 40 80\nopen d2 1; wait 200; click d1 0 0; esc d2")
                .unwrap();
        assert_eq!(
            steps,
            vec![
                Step::Mount { id: "d1".into(), snap_points: None },
                Step::Mount { id: "d2".into(), snap_points: Some(vec![40, 80]) },
                Step::Open { id: "d2".into(), index: Some(1) },
                Step::Wait(Duration::from_millis(200)),
                Step::Click { id: "d1".into(), column: 0, row: 0 },
                Step::Esc("d2".into()),
            ]
        );
    }

    #[test]
    fn test_parse_errors_name_the_step() {
        let err = parse_script("mount d1; jump d1").unwrap_err();
        assert!(format!("{:#}", err).contains("step 2"));

        assert!(parse_script("wait soon").is_err());
        assert!(parse_script("close").is_err());
        assert!(parse_script("close d1 d2").is_err());
        assert!(parse_script("click d1 3").is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_escape_scenario_timeline() {
        let steps = parse_script("mount d1; open d1; wait 200; esc d1; wait 200").unwrap();
        let lines = run_script(DialogConfig::new(), &steps, Rect::new(0, 0, 80, 24))
            .await
            .unwrap();

        assert_eq!(
            names(&lines),
            vec![
                (0, "closed->opening".to_string()),
                (0, "registry_changed".to_string()),
                (150, "opening->open".to_string()),
                (200, "dismissed".to_string()),
                (200, "open->closing".to_string()),
                (350, "closing->closed".to_string()),
                (350, "registry_changed".to_string()),
            ]
        );
        assert_eq!(lines[3]["trigger"], "escape_key");
    }

    #[tokio::test(start_paused = true)]
    async fn test_backdrop_click_dismisses() {
        let steps = parse_script("mount d1; open d1; wait 200; click d1 0 0; wait 200").unwrap();
        let lines = run_script(DialogConfig::new(), &steps, Rect::new(0, 0, 80, 24))
            .await
            .unwrap();

        let dismissed: Vec<&Value> = lines
            .iter()
            .filter(|line| line["event"] == "dismissed")
            .collect();
        assert_eq!(dismissed.len(), 1);
        assert_eq!(dismissed[0]["trigger"], "backdrop");
        assert_eq!(lines.last().unwrap()["any_open"], false);
    }

    #[tokio::test(start_paused = true)]
    async fn test_steps_on_unmounted_dialog_are_inert() {
        let steps = parse_script("open ghost; close ghost; esc ghost; wait 10").unwrap();
        let lines = run_script(DialogConfig::new(), &steps, Rect::new(0, 0, 80, 24))
            .await
            .unwrap();
        assert!(lines.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_unknown_dialog_fails() {
        let steps = parse_script("unmount ghost").unwrap();
        assert!(run_script(DialogConfig::new(), &steps, Rect::new(0, 0, 80, 24))
            .await
            .is_err());
    }
}
