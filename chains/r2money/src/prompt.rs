//! Interactive menu flow.
//!
//! The flow is a small state machine: pick an action, enter the run
//! parameters, then pick a swap direction or liquidity pair. Choosing
//! `Exit` ends it without a request.

use crate::venue::Pair;
use anyhow::Result;
use core_logic::RunParameters;
use dialoguer::{theme::ColorfulTheme, Input, Select};

pub const MENU_ITEMS: [&str; 4] = [
    "SWAP R2 <-> USDC",
    "ADD LIQUIDITY",
    "REMOVE LIQUIDITY",
    "Exit",
];
pub const DIRECTION_ITEMS: [&str; 2] = ["R2 -> USDC", "USDC -> R2"];

pub const PERCENTAGE_PROMPT: &str = "Enter token percentage to use (5-100%):";
pub const ITERATIONS_PROMPT: &str = "Enter number of transactions to run per wallet (1-100):";
pub const DELAY_PROMPT: &str = "Enter delay between transactions in seconds (5-100):";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapDirection {
    R2ToUsdc,
    UsdcToR2,
}

impl SwapDirection {
    pub fn label(&self) -> &'static str {
        match self {
            SwapDirection::R2ToUsdc => DIRECTION_ITEMS[0],
            SwapDirection::UsdcToR2 => DIRECTION_ITEMS[1],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Swap,
    AddLiquidity,
    RemoveLiquidity,
    Exit,
}

impl MenuChoice {
    fn from_index(index: usize) -> Self {
        match index {
            0 => MenuChoice::Swap,
            1 => MenuChoice::AddLiquidity,
            2 => MenuChoice::RemoveLiquidity,
            _ => MenuChoice::Exit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Swap(SwapDirection),
    AddLiquidity(Pair),
    RemoveLiquidity(Pair),
}

impl ActionKind {
    pub fn describe(&self) -> String {
        match self {
            ActionKind::Swap(direction) => format!("Swap {}", direction.label()),
            ActionKind::AddLiquidity(pair) => format!("Add liquidity {}", pair),
            ActionKind::RemoveLiquidity(pair) => format!("Remove liquidity {}", pair),
        }
    }
}

/// A fully specified run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionRequest {
    pub kind: ActionKind,
    pub params: RunParameters,
}

/// Source of operator answers.
pub trait Prompter {
    fn select(&mut self, prompt: &str, items: &[&str]) -> Result<usize>;

    /// Must only return values inside `min..=max`.
    fn number_in_range(&mut self, prompt: &str, min: u64, max: u64) -> Result<u64>;
}

/// Parses a whole-number answer and checks its range.
pub fn parse_in_range(input: &str, min: u64, max: u64) -> Result<u64, String> {
    let value: u64 = input
        .trim()
        .parse()
        .map_err(|_| format!("Please enter a whole number between {} and {}", min, max))?;

    if value < min || value > max {
        return Err(format!("Please enter a number between {} and {}", min, max));
    }
    Ok(value)
}

/// Terminal prompts using dialoguer.
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn select(&mut self, prompt: &str, items: &[&str]) -> Result<usize> {
        Ok(Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(0)
            .items(items)
            .interact()?)
    }

    fn number_in_range(&mut self, prompt: &str, min: u64, max: u64) -> Result<u64> {
        let answer: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .validate_with(|input: &String| parse_in_range(input, min, max).map(|_| ()))
            .interact_text()?;

        parse_in_range(&answer, min, max).map_err(anyhow::Error::msg)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    SelectAction,
    EnterParameters(MenuChoice),
    SelectTarget(MenuChoice, RunParameters),
    Ready(ActionRequest),
    Exit,
}

/// Runs the menu until a request is complete or the operator exits.
pub fn collect_request(prompter: &mut dyn Prompter) -> Result<Option<ActionRequest>> {
    let mut stage = Stage::SelectAction;

    loop {
        stage = match stage {
            Stage::SelectAction => {
                let choice = MenuChoice::from_index(prompter.select("Select action", &MENU_ITEMS)?);
                if choice == MenuChoice::Exit {
                    Stage::Exit
                } else {
                    Stage::EnterParameters(choice)
                }
            }
            Stage::EnterParameters(choice) => {
                let params = read_parameters(prompter)?;
                Stage::SelectTarget(choice, params)
            }
            Stage::SelectTarget(choice, params) => {
                let kind = match choice {
                    MenuChoice::Swap => {
                        let direction = match prompter.select("Select swap direction", &DIRECTION_ITEMS)? {
                            0 => SwapDirection::R2ToUsdc,
                            _ => SwapDirection::UsdcToR2,
                        };
                        ActionKind::Swap(direction)
                    }
                    MenuChoice::AddLiquidity => ActionKind::AddLiquidity(select_pair(prompter)?),
                    MenuChoice::RemoveLiquidity => {
                        ActionKind::RemoveLiquidity(select_pair(prompter)?)
                    }
                    MenuChoice::Exit => return Ok(None),
                };
                Stage::Ready(ActionRequest { kind, params })
            }
            Stage::Ready(request) => return Ok(Some(request)),
            Stage::Exit => return Ok(None),
        };
    }
}

fn read_parameters(prompter: &mut dyn Prompter) -> Result<RunParameters> {
    let pct = &RunParameters::PERCENTAGE_RANGE;
    let iter = &RunParameters::ITERATION_RANGE;
    let delay = &RunParameters::DELAY_RANGE;

    let percentage =
        prompter.number_in_range(PERCENTAGE_PROMPT, *pct.start() as u64, *pct.end() as u64)?;
    let iterations =
        prompter.number_in_range(ITERATIONS_PROMPT, *iter.start() as u64, *iter.end() as u64)?;
    let delay_secs = prompter.number_in_range(DELAY_PROMPT, *delay.start(), *delay.end())?;

    Ok(RunParameters::new(
        u32::try_from(percentage)?,
        u32::try_from(iterations)?,
        delay_secs,
    )?)
}

fn select_pair(prompter: &mut dyn Prompter) -> Result<Pair> {
    let labels: Vec<&str> = Pair::ALL.iter().map(|p| p.label()).collect();
    let index = prompter.select("Select liquidity pair", &labels)?;
    Ok(Pair::ALL.get(index).copied().unwrap_or(Pair::R2Usdc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays canned answers and records every prompt shown.
    #[derive(Default)]
    struct ScriptedPrompter {
        selections: VecDeque<usize>,
        numbers: VecDeque<u64>,
        asked: Vec<String>,
    }

    impl ScriptedPrompter {
        fn new(selections: &[usize], numbers: &[u64]) -> Self {
            Self {
                selections: selections.iter().copied().collect(),
                numbers: numbers.iter().copied().collect(),
                asked: Vec::new(),
            }
        }
    }

    impl Prompter for ScriptedPrompter {
        fn select(&mut self, prompt: &str, items: &[&str]) -> Result<usize> {
            self.asked.push(format!("{} {:?}", prompt, items));
            self.selections
                .pop_front()
                .ok_or_else(|| anyhow::anyhow!("no selection scripted"))
        }

        fn number_in_range(&mut self, prompt: &str, min: u64, max: u64) -> Result<u64> {
            self.asked.push(prompt.to_string());
            let value = self
                .numbers
                .pop_front()
                .ok_or_else(|| anyhow::anyhow!("no number scripted"))?;
            assert!(value >= min && value <= max);
            Ok(value)
        }
    }

    #[test]
    fn test_exit_returns_none_without_further_prompts() {
        let mut prompter = ScriptedPrompter::new(&[3], &[]);

        assert_eq!(collect_request(&mut prompter).unwrap(), None);
        assert_eq!(prompter.asked.len(), 1);
    }

    #[test]
    fn test_swap_flow() {
        let mut prompter = ScriptedPrompter::new(&[0, 1], &[10, 3, 15]);

        let request = collect_request(&mut prompter).unwrap().unwrap();

        assert_eq!(request.kind, ActionKind::Swap(SwapDirection::UsdcToR2));
        assert_eq!(request.params, RunParameters::new(10, 3, 15).unwrap());
        // parameters are asked before the direction
        assert_eq!(prompter.asked[1], PERCENTAGE_PROMPT);
        assert_eq!(prompter.asked[2], ITERATIONS_PROMPT);
        assert_eq!(prompter.asked[3], DELAY_PROMPT);
        assert!(prompter.asked[4].contains("R2 -> USDC"));
    }

    #[test]
    fn test_remove_liquidity_pair_selection() {
        let mut prompter = ScriptedPrompter::new(&[2, 3], &[100, 1, 5]);

        let request = collect_request(&mut prompter).unwrap().unwrap();

        assert_eq!(request.kind, ActionKind::RemoveLiquidity(Pair::R2usdSr2usd));
        assert!(prompter.asked[4].contains("R2USD-sR2USD"));
    }

    #[test]
    fn test_parse_in_range() {
        assert_eq!(parse_in_range(" 42 ", 5, 100), Ok(42));
        assert!(parse_in_range("4", 5, 100).is_err());
        assert!(parse_in_range("101", 5, 100).is_err());
        assert!(parse_in_range("abc", 5, 100).is_err());
        assert!(parse_in_range("", 1, 100).is_err());
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            ActionKind::AddLiquidity(Pair::R2Usdc).describe(),
            "Add liquidity R2-USDC"
        );
        assert_eq!(
            ActionKind::Swap(SwapDirection::R2ToUsdc).describe(),
            "Swap R2 -> USDC"
        );
    }
}
