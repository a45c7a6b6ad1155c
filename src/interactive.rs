//! Interactive console session: prompt for filters, print reports, page raw data.

use anyhow::{Context, Result};
use bikeshare_stats::{
    analysis::run_analysis,
    config::CityConfig,
    filter::{FilterSpec, parse_day, parse_month},
    output::{render_raw_page, render_report},
    raw::RawPager,
};
use std::io::{BufRead, Write};
use tracing::{error, info};

/// Reads answers from `input` and writes questions to `output`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    pub fn say(&mut self, text: &str) -> Result<()> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        Ok(())
    }

    /// Asks one question. `None` means the input was closed.
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        self.say(question)?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Repeats `question` until `parse` accepts the answer.
    fn ask_until<T>(
        &mut self,
        question: &str,
        invalid: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Option<T>> {
        loop {
            let Some(answer) = self.ask(question)? else {
                return Ok(None);
            };
            match parse(&answer) {
                Some(value) => return Ok(Some(value)),
                None => self.say(invalid)?,
            }
        }
    }

    /// Prompts for city, month and day. `None` if the input closes first.
    pub fn filters(&mut self, config: &CityConfig) -> Result<Option<FilterSpec>> {
        self.say("Hello! Let's explore some US bikeshare data!\n")?;

        let cities = config
            .iter()
            .map(|(city, _)| title_case(city))
            .collect::<Vec<_>>()
            .join(", ");
        let city_question = format!(
            "\nWhich city would you like to filter the data by? Your options are:\n\n{cities}.\n\nPlease enter city to filter by: "
        );
        let Some(city) = self.ask_until(
            &city_question,
            "\nThat is not a valid city! Please enter from the available cities.\n",
            |answer| config.contains(answer).then(|| answer.to_lowercase()),
        )?
        else {
            return Ok(None);
        };

        let Some(month) = self.ask_until(
            "\nWhich month would you like to filter the data by? Your options are:\n\nJan, Feb, Mar, Apr, May, Jun, or All to use all months.\n\nPlease enter month to filter by: ",
            "\nThat is not a valid month! Please enter from the available months.\n",
            |answer| parse_month(answer).ok(),
        )?
        else {
            return Ok(None);
        };

        let Some(day) = self.ask_until(
            "\nWhich day would you like to filter the data by? Your options are:\n\nMon, Tue, Wed, Thu, Fri, Sat, Sun, or All to use all days.\n\nPlease enter day to filter by: ",
            "\nThat is not a valid day! Please enter from the available days.\n",
            |answer| parse_day(answer).ok(),
        )?
        else {
            return Ok(None);
        };

        self.say(&format!("{}\n", "-".repeat(40)))?;
        Ok(Some(FilterSpec { city, month, day }))
    }

    /// Asks a yes/no question until one of the two is given. A closed input
    /// counts as "no".
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.ask_until(
            question,
            "\nThat is not a valid response! Please enter either 'yes' or 'no'\n",
            |answer| match answer.to_lowercase().as_str() {
                "yes" | "y" => Some(true),
                "no" | "n" => Some(false),
                _ => None,
            },
        )?;
        Ok(answer.unwrap_or(false))
    }

    /// Asks once whether to start over; anything but "yes" ends the session.
    pub fn restart(&mut self) -> Result<bool> {
        let answer = self.ask("\nWould you like to restart? Enter yes or no.\n")?;
        Ok(answer.is_some_and(|a| a.eq_ignore_ascii_case("yes")))
    }
}

fn title_case(city: &str) -> String {
    city.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Offers raw rows of `city` five at a time until declined or exhausted.
fn page_raw<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    config: &CityConfig,
    city: &str,
) -> Result<()> {
    let mut pager = RawPager::open(config, city)
        .with_context(|| format!("failed to open raw data for '{city}'"))?;

    while prompter.confirm("\nDo you wish to view the raw data? yes or no: ")? {
        match pager.next_page()? {
            Some(page) => {
                prompter.say("\nRaw data:\n\n")?;
                prompter.say(&render_raw_page(&page)?)?;
            }
            None => {
                prompter.say("\nNo more raw data to display.\n")?;
                break;
            }
        }
    }
    Ok(())
}

/// Runs analysis passes until the user declines to restart or input ends.
pub fn run_session<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    config: &CityConfig,
) -> Result<()> {
    loop {
        let Some(spec) = prompter.filters(config)? else {
            break;
        };
        info!(filter = %spec, "Filter selected");

        match run_analysis(config, &spec) {
            Ok(report) => {
                prompter.say(&render_report(&report)?)?;
                if let Err(e) = page_raw(prompter, config, &spec.city) {
                    error!(error = %e, "Raw data paging failed");
                    prompter.say(&format!("\n{e:#}\n"))?;
                }
            }
            Err(e) => {
                error!(error = %e, "Analysis failed");
                prompter.say(&format!("\n{e:#}\n"))?;
            }
        }

        if !prompter.restart()? {
            break;
        }
    }

    prompter.say("\nGoodbye!\n")?;
    Ok(())
}
