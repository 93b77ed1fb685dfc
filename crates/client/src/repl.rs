//! Line-oriented terminal driver.
//!
//! Reads one command per line, applies it to the [`Runtime`], then prints
//! any new combat log lines. Combats chain floor after floor until the
//! player dies, gives up or input ends.
use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use game_core::expression::tokens_to_string;
use game_core::{CombatPhase, CombatPreview, CombatSession};
use runtime::Runtime;

const HELP: &str = "\
Commands:
  d <n>        place die n
  o <n>        place operator card n
  rm <i>       remove token i
  mv <i> <j>   move token i before slot j
  clear        clear the expression
  hold <n>     hold or release die n
  reroll       reroll unheld dice
  boss         reroll the boss target (once)
  preview      show what submitting would do
  go           submit the expression
  show         redraw the table
  giveup       abandon the run
  quit         leave";

/// One parsed input line. Positions are 1-based as typed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Show,
    Die(usize),
    Operator(usize),
    Remove(usize),
    Move(usize, usize),
    Clear,
    Hold(usize),
    Reroll,
    BossReroll,
    Preview,
    Submit,
    GiveUp,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let word = parts.next().ok_or_else(|| anyhow!("type `help` for commands"))?;
        let mut position = || -> Result<usize> {
            let raw = parts
                .next()
                .ok_or_else(|| anyhow!("`{word}` needs a position"))?;
            let n: usize = raw
                .parse()
                .with_context(|| format!("`{raw}` is not a position"))?;
            if n == 0 {
                bail!("positions start at 1");
            }
            Ok(n)
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "help" | "?" => Self::Help,
            "show" | "ls" => Self::Show,
            "d" | "die" => Self::Die(position()?),
            "o" | "op" => Self::Operator(position()?),
            "rm" => Self::Remove(position()?),
            "mv" => {
                let from = position()?;
                Self::Move(from, position()?)
            }
            "clear" => Self::Clear,
            "hold" => Self::Hold(position()?),
            "reroll" | "r" => Self::Reroll,
            "boss" => Self::BossReroll,
            "preview" | "p" => Self::Preview,
            "go" | "submit" => Self::Submit,
            "giveup" => Self::GiveUp,
            "quit" | "exit" | "q" => Self::Quit,
            other => bail!("unknown command `{other}`; type `help`"),
        };
        Ok(command)
    }
}

enum Flow {
    Continue,
    Quit,
}

pub struct Repl<R, W> {
    runtime: Runtime,
    input: R,
    out: W,
    /// Combat log lines already printed.
    log_cursor: usize,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    pub fn new(runtime: Runtime, input: R, out: W) -> Self {
        Self {
            runtime,
            input,
            out,
            log_cursor: 0,
        }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn run(&mut self) -> Result<()> {
        let mut line = String::new();
        loop {
            if self.runtime.combat().is_none() {
                if self.runtime.is_run_over() {
                    self.summary()?;
                    return Ok(());
                }
                let encounter = self.runtime.next_encounter();
                self.runtime.start_combat(encounter)?;
                self.log_cursor = 0;
                self.flush_log()?;
                self.show()?;
            }

            write!(self.out, "> ")?;
            self.out.flush()?;
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(());
            }
            if line.trim().is_empty() {
                continue;
            }

            let flow = line
                .trim()
                .parse::<Command>()
                .and_then(|command| self.execute(command));
            match flow {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => return Ok(()),
                Err(e) => writeln!(self.out, "! {e}")?,
            }

            self.flush_log()?;
            if self.runtime.combat().is_some_and(CombatSession::is_over) {
                match self.runtime.finish_combat()? {
                    CombatPhase::Victory => writeln!(
                        self.out,
                        "\n=== Floor {} ===",
                        self.runtime.context().run.floor
                    )?,
                    _ => writeln!(self.out, "\nYou fall in the dungeon.")?,
                }
            }
        }
    }

    fn execute(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Show => self.show()?,
            Command::Die(n) => {
                let id = self.die_at(n)?;
                self.runtime.place_die(id)?;
                self.expression()?;
            }
            Command::Operator(n) => {
                self.runtime.place_operator(n - 1)?;
                self.expression()?;
            }
            Command::Remove(i) => {
                self.runtime.remove_token(i - 1)?;
                self.expression()?;
            }
            Command::Move(from, to) => {
                self.runtime.move_token(from - 1, to - 1)?;
                self.expression()?;
            }
            Command::Clear => {
                self.runtime.clear_expression()?;
                self.expression()?;
            }
            Command::Hold(n) => {
                let id = self.die_at(n)?;
                let held = self.runtime.toggle_hold(id)?;
                writeln!(self.out, "die {n} {}", if held { "held" } else { "released" })?;
            }
            Command::Reroll => {
                if self.runtime.reroll()? {
                    self.show()?;
                } else {
                    writeln!(self.out, "No rerolls left.")?;
                }
            }
            Command::BossReroll => {
                if !self.runtime.reroll_boss_target()? {
                    writeln!(self.out, "The target cannot be rerolled.")?;
                }
            }
            Command::Preview => {
                let preview = self.runtime.preview()?;
                self.print_preview(&preview)?;
            }
            Command::Submit => {
                let resolution = self.runtime.evaluate()?;
                if resolution.phase == CombatPhase::Building {
                    self.flush_log()?;
                    self.show()?;
                }
            }
            Command::GiveUp => self.runtime.give_up(),
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn session(&self) -> Result<&CombatSession> {
        self.runtime.combat().context("no combat in progress")
    }

    fn die_at(&self, n: usize) -> Result<game_core::DieId> {
        self.session()?
            .dice
            .get(n - 1)
            .map(|d| d.id)
            .ok_or_else(|| anyhow!("no die at position {n}"))
    }

    fn flush_log(&mut self) -> Result<()> {
        let Some(session) = self.runtime.combat() else {
            return Ok(());
        };
        for line in session.log.iter().skip(self.log_cursor) {
            writeln!(self.out, "{line}")?;
        }
        self.log_cursor = session.log.len();
        Ok(())
    }

    fn expression(&mut self) -> Result<()> {
        let text = tokens_to_string(&self.session()?.expression);
        writeln!(self.out, "Expr: {text}")?;
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        let ctx = self.runtime.context();
        let session = self.session()?;
        let monster = &session.monster;

        let mut text = format!(
            "\nFloor {} | {} ({}{}) target {} | You {}/{} HP, {} gold\n",
            ctx.run.floor,
            monster.name,
            monster.attack_dice_count,
            monster.attack_die,
            monster.hp,
            ctx.player.hp,
            ctx.player.max_hp,
            ctx.player.gold
        );
        if let Some(ability) = monster.boss {
            text.push_str(&format!("Boss: {}\n", ability.description()));
        }
        for condition in &session.conditions {
            text.push_str(&format!(
                "Condition: {}: {}\n",
                condition.name(),
                condition.description()
            ));
        }
        let dice = session
            .dice
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let value = d.value.map_or_else(|| "-".to_string(), |v| v.to_string());
                let held = if d.held { "*" } else { "" };
                let used = if session.is_placed(d.id) { "'" } else { "" };
                format!("[{}] {}={value}{held}{used}", i + 1, d.spec.die_type)
            })
            .collect::<Vec<_>>()
            .join("  ");
        let hand = ctx
            .player
            .operator_hand
            .iter()
            .enumerate()
            .map(|(i, op)| format!("[{}] {}", i + 1, op.definition().symbol))
            .collect::<Vec<_>>()
            .join("  ");
        text.push_str(&format!(
            "Dice: {dice}\nHand: {hand}\nExpr: {}\nTurn {} | rerolls left {}",
            tokens_to_string(&session.expression),
            session.turn,
            session.rerolls_left
        ));
        writeln!(self.out, "{text}")?;
        Ok(())
    }

    fn print_preview(&mut self, preview: &CombatPreview) -> Result<()> {
        writeln!(
            self.out,
            "= {} ({} dice, {} operators)",
            preview.result, preview.dice_used, preview.operators_used
        )?;
        if let Some(summary) = preview.combos.summary() {
            writeln!(self.out, "{summary}")?;
        }
        if let Some(error) = &preview.condition_error {
            writeln!(self.out, "Rejected: {error}")?;
        }
        if let Some(warning) = &preview.boss_warning {
            writeln!(self.out, "{warning}")?;
        }
        if let Some(damage) = &preview.damage {
            if damage.attack_dice_count == 0 {
                writeln!(self.out, "No retaliation.")?;
            } else {
                writeln!(
                    self.out,
                    "Retaliation {}{}: {}-{} damage",
                    damage.attack_dice_count,
                    damage.attack_die,
                    damage.min_damage,
                    damage.max_damage
                )?;
            }
        }
        Ok(())
    }

    fn summary(&mut self) -> Result<()> {
        let run = &self.runtime.context().run;
        let stats = &run.stats;
        writeln!(
            self.out,
            "\nRun over on floor {} (act {}). Kills {}, exact hits {}, turns {}, gold earned {}, best combo x{}.",
            run.floor,
            run.act,
            stats.monsters_killed,
            stats.exact_hits,
            stats.turns_played,
            stats.gold_earned,
            stats.best_combo_multiplier
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repl(script: &str) -> Repl<&[u8], Vec<u8>> {
        let runtime = Runtime::builder().seed(42).build().unwrap();
        Repl::new(runtime, script.as_bytes(), Vec::new())
    }

    fn output(repl: &Repl<&[u8], Vec<u8>>) -> String {
        String::from_utf8_lossy(&repl.out).into_owned()
    }

    #[test]
    fn commands_parse_with_positions() {
        assert_eq!("d 3".parse::<Command>().unwrap(), Command::Die(3));
        assert_eq!("MV 2 1".parse::<Command>().unwrap(), Command::Move(2, 1));
        assert_eq!("go".parse::<Command>().unwrap(), Command::Submit);
        assert!("d".parse::<Command>().is_err());
        assert!("d 0".parse::<Command>().is_err());
        assert!("dance".parse::<Command>().is_err());
    }

    #[test]
    fn placing_dice_echoes_the_expression() {
        let mut r = repl("d 1\no 1\nd 2\nquit\n");
        r.run().unwrap();
        let out = output(&r);
        assert!(out.contains("appears! Target:"));
        assert!(out.contains("Expr: "));
        assert_eq!(r.runtime().combat().unwrap().expression.len(), 3);
    }

    #[test]
    fn bad_input_is_reported_not_fatal() {
        let mut r = repl("d 9\nrm 1\nwhat\nquit\n");
        r.run().unwrap();
        let out = output(&r);
        assert!(out.contains("! no die at position 9"));
        assert!(out.contains("! unknown command `what`"));
        assert!(r.runtime().combat().is_some());
    }

    #[test]
    fn giving_up_prints_the_summary() {
        let mut r = repl("giveup\n");
        r.run().unwrap();
        assert!(output(&r).contains("Run over on floor 0"));
        assert!(r.runtime().is_run_over());
    }
}
