// Entry point and terminal control loop.
//
// Option [1] loads the production CSV, [2] edits the filters, [3] builds the
// dashboard, prints it and exports the files, [4] switches the table theme.
// With `--batch` the dashboard is built once from the command-line flags.
use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use log::{error, info, warn};
use production_dashboard::config::{Config, Theme};
use production_dashboard::filter::{parse_names, parse_year_range, resolve_selection};
use production_dashboard::{build, loader, output, Dataset, FilterSpec, SortKey};
use std::io::{self, BufRead, Write};

struct App<R> {
    input: R,
    config: Config,
    theme: Theme,
    dataset: Option<Dataset>,
    filter: Option<FilterSpec>,
}

/// Print `prompt` and read one trimmed line. `None` once input is exhausted.
fn read_line<R: BufRead>(input: &mut R, prompt: &str) -> Option<String> {
    print!("{prompt}");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match input.read_line(&mut buf) {
        Ok(0) => None,
        Ok(_) => Some(buf.trim().to_string()),
        Err(e) => {
            warn!("failed to read input: {e}");
            None
        }
    }
}

/// Returns `true` if the user chose `Y`, `false` on `N` or end of input.
fn prompt_back_to_menu<R: BufRead>(input: &mut R) -> bool {
    loop {
        let Some(answer) = read_line(input, "Back to menu (Y/N): ") else {
            return false;
        };
        match answer.to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

impl<R: BufRead> App<R> {
    fn new(config: Config, input: R) -> Self {
        Self {
            input,
            theme: config.theme,
            config,
            dataset: None,
            filter: None,
        }
    }

    fn handle_load(&mut self) {
        match loader::load_dataset(&self.config.data) {
            Ok((dataset, report)) => {
                println!(
                    "Loaded {} records ({} states, {} regions).\n",
                    report.rows, report.states, report.regions
                );
                self.filter = Some(dataset.default_filter());
                self.dataset = Some(dataset);
            }
            Err(e) => {
                error!("failed to load {}: {e}", self.config.data.display());
                eprintln!("Failed to load file: {e}\n");
            }
        }
    }

    fn handle_filters(&mut self) {
        let (Some(dataset), Some(current)) = (&self.dataset, &self.filter) else {
            println!("Error: No data loaded. Please load the dataset first (option 1).\n");
            return;
        };
        let mut spec = current.clone();

        let Some(years) = read_line(
            &mut self.input,
            &format!("Year range [{}-{}]: ", spec.year_min, spec.year_max),
        ) else {
            return;
        };
        if !years.is_empty() {
            match parse_year_range(&years) {
                Some((from, to)) => {
                    spec.year_min = from;
                    spec.year_max = to;
                }
                None => println!("Invalid year range '{years}', keeping current."),
            }
        }

        println!(
            "Regions: {}",
            dataset.regions().iter().cloned().collect::<Vec<_>>().join(", ")
        );
        let Some(names) = read_line(&mut self.input, "Regions (comma separated, blank for all): ")
        else {
            return;
        };
        let names = parse_names(&names);
        let (regions, unknown) =
            resolve_selection(&names, dataset.regions().iter().map(String::as_str));
        for name in unknown {
            warn!("ignoring unknown region '{name}'");
        }
        spec.regions = regions;

        let Some(names) = read_line(&mut self.input, "States (comma separated, blank for all): ")
        else {
            return;
        };
        let names = parse_names(&names);
        let (states, unknown) = resolve_selection(&names, dataset.states());
        for name in unknown {
            warn!("ignoring unknown state '{name}'");
        }
        spec.states = states;

        let Some(sort) = read_line(
            &mut self.input,
            &format!("Sort by (production/state/region) [{}]: ", spec.sort_key),
        ) else {
            return;
        };
        if !sort.is_empty() {
            match sort.parse::<SortKey>() {
                Ok(key) => spec.sort_key = key,
                Err(e) => println!("{e}, keeping {}.", spec.sort_key),
            }
        }

        info!("filter updated: {spec:?}");
        self.filter = Some(spec);
        println!();
    }

    fn handle_generate(&self) -> Result<()> {
        let (Some(dataset), Some(spec)) = (&self.dataset, &self.filter) else {
            println!("Error: No data loaded. Please load the dataset first (option 1).\n");
            return Ok(());
        };
        render_and_export(dataset, spec, &self.config, self.theme)
    }

    fn handle_toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        println!("Switched to {}.\n", self.theme.label());
    }

    fn run(&mut self) {
        loop {
            println!("Production Dashboard ({})", self.theme.label());
            println!("[1] Load dataset");
            println!("[2] Set filters");
            println!("[3] Generate dashboard");
            println!("[4] Toggle theme");
            println!("[0] Exit\n");
            let Some(choice) = read_line(&mut self.input, "Enter choice: ") else {
                info!("end of input, exiting");
                break;
            };
            match choice.as_str() {
                "1" => self.handle_load(),
                "2" => self.handle_filters(),
                "3" => {
                    println!();
                    if let Err(e) = self.handle_generate() {
                        eprintln!("Export error: {e:#}\n");
                    }
                    if !prompt_back_to_menu(&mut self.input) {
                        println!("Exiting the program.");
                        break;
                    }
                }
                "4" => self.handle_toggle_theme(),
                "0" => {
                    println!("Exiting the program.");
                    break;
                }
                _ => println!("Invalid choice. Please enter 0-4.\n"),
            }
        }
    }
}

fn render_and_export(
    dataset: &Dataset,
    spec: &FilterSpec,
    config: &Config,
    theme: Theme,
) -> Result<()> {
    let dashboard = build(dataset, spec);
    if dashboard.is_empty() {
        println!("No records match the current filters.\n");
    }
    output::print_dashboard(&dashboard, theme, config.preview_rows);
    let written = output::export_dashboard(&dashboard, &config.out_dir, Utc::now())?;
    println!(
        "Exported {} files to {}\n",
        written.len(),
        config.out_dir.display()
    );
    Ok(())
}

fn run_batch(config: &Config) -> Result<()> {
    let (dataset, _) = loader::load_dataset(&config.data)
        .with_context(|| format!("loading {}", config.data.display()))?;
    let spec = config.filter_spec(&dataset);
    render_and_export(&dataset, &spec, config, config.theme)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    if config.batch {
        return run_batch(&config);
    }
    App::new(config, io::stdin().lock()).run();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn app(input: &[u8]) -> App<&[u8]> {
        let fixture = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures/production_sample.csv")
            .to_string_lossy()
            .into_owned();
        let config = Config::parse_from([
            "production_dashboard",
            "--theme",
            "dark",
            "--data",
            fixture.as_str(),
        ]);
        App::new(config, input)
    }

    #[test]
    fn menu_exits_on_empty_input() {
        let mut app = app(b"");
        app.run();
        assert!(app.dataset.is_none());
        assert_eq!(app.theme, Theme::Dark);
    }

    #[test]
    fn menu_exits_when_input_ends_after_a_choice() {
        let mut app = app(b"4\n");
        app.run();
        assert_eq!(app.theme, Theme::Light);
    }

    #[test]
    fn generate_without_data_stops_at_end_of_input() {
        let mut app = app(b"3\n");
        app.run();
        assert!(app.filter.is_none());
    }

    #[test]
    fn filter_prompts_abandon_edit_at_end_of_input() {
        let mut app = app(b"1\n2\n2021-2021\n");
        app.run();
        let dataset = app.dataset.as_ref().expect("fixture loaded");
        assert_eq!(app.filter, Some(dataset.default_filter()));
    }

    #[test]
    fn back_to_menu_prompt() {
        assert!(prompt_back_to_menu(&mut &b"maybe\ny\n"[..]));
        assert!(!prompt_back_to_menu(&mut &b"N\n"[..]));
        assert!(!prompt_back_to_menu(&mut &b""[..]));
    }
}
