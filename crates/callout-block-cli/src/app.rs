use anyhow::{Context, Result};
use callout_block_config::Config;
use callout_block_engine::{
    BlockConfig, BlockState, CalloutBlock, Key, KeyEvent, KeyOutcome, PasteEvent, Range,
    StaticHost, metadata,
};
use crossterm::event::{KeyCode, KeyEvent as TermKeyEvent, KeyModifiers};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// Terminal host for one callout block stored as a JSON record
pub struct App {
    pub path: PathBuf,
    pub block: CalloutBlock,
    /// Caret as a char offset into the surface text
    pub caret: usize,
    pub status: String,
    saved: BlockState,
}

impl App {
    pub fn open(path: PathBuf, config: &BlockConfig, host: &StaticHost) -> Result<Self> {
        let block = if path.exists() {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            CalloutBlock::from_json(&json, config, host)
                .with_context(|| format!("decoding {}", path.display()))?
        } else {
            log::info!("{} does not exist yet, starting empty", path.display());
            CalloutBlock::new(BlockState::default(), config, host)
        };
        let saved = block.data().clone();
        let caret = Self::surface_text(&block).chars().count();

        Ok(Self {
            path,
            block,
            caret,
            status: String::new(),
            saved,
        })
    }

    fn surface_text(block: &CalloutBlock) -> String {
        block
            .surface()
            .map(|surface| surface.text_content())
            .unwrap_or_default()
    }

    pub fn text(&self) -> String {
        Self::surface_text(&self.block)
    }

    fn text_len(&self) -> usize {
        self.text().chars().count()
    }

    pub fn is_dirty(&self) -> bool {
        self.block
            .save(self.block.render())
            .map(|state| state != self.saved)
            .unwrap_or(false)
    }

    pub fn handle_key(&mut self, key: TermKeyEvent) -> Result<Action> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let block_key = match key.code {
            KeyCode::Tab => Some(Key::Tab),
            KeyCode::Enter => Some(Key::Enter),
            KeyCode::Backspace => Some(Key::Backspace),
            KeyCode::Char(c) if !ctrl => Some(Key::Char(c)),
            _ => None,
        };
        if let Some(block_key) = block_key
            && self.key_down(block_key)?
        {
            return Ok(Action::Continue);
        }

        match key.code {
            KeyCode::Esc => return Ok(Action::Quit),
            KeyCode::Char('q') if ctrl => return Ok(Action::Quit),
            KeyCode::Char('s') if ctrl => self.save()?,
            KeyCode::Char(c) if !ctrl => self.insert(&c.to_string()),
            KeyCode::Enter if metadata::enable_line_breaks() => self.insert("\n"),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Left => self.caret = self.caret.saturating_sub(1),
            KeyCode::Right => self.caret = (self.caret + 1).min(self.text_len()),
            KeyCode::Home => self.caret = 0,
            KeyCode::End => self.caret = self.text_len(),
            _ => {}
        }
        Ok(Action::Continue)
    }

    /// Clipboard content: fragments the block claims replace it, anything
    /// else is typed in at the caret
    pub fn paste(&mut self, clipboard: &str) {
        match PasteEvent::route(clipboard) {
            Some(event) => {
                let sync = self.block.on_paste(&event);
                self.caret = self.text_len();
                self.status = format!("Pasted callout content ({sync:?})");
            }
            None => self.insert(clipboard),
        }
    }

    fn insert(&mut self, text: &str) {
        let caret = self.caret;
        let Some(surface) = self.block.surface_mut() else {
            return;
        };
        let Some(point) = surface.point_at_char_offset(caret) else {
            return;
        };
        if surface.insert_text(&point, text).is_some() {
            self.caret += text.chars().count();
        }
    }

    /// Offer a keydown to the block's listener first; true when it
    /// suppressed the key's default action
    fn key_down(&mut self, key: Key) -> Result<bool> {
        let mut range = self
            .block
            .surface()
            .and_then(|surface| surface.point_at_char_offset(self.caret))
            .map(Range::collapsed);
        let mut event = KeyEvent::new(key);
        if let KeyOutcome::Inserted { caret } =
            self.block.handle_key_down(&mut event, range.as_mut())?
            && let Some(offset) = self
                .block
                .surface()
                .and_then(|surface| surface.char_offset_of(&caret))
        {
            self.caret = offset;
        }
        Ok(event.default_prevented())
    }

    fn backspace(&mut self) {
        if self.caret == 0 {
            return;
        }
        let caret = self.caret;
        let Some(surface) = self.block.surface_mut() else {
            return;
        };
        let deleted = surface
            .point_at_char_offset(caret)
            .and_then(|point| surface.delete_backward(&point));
        if deleted.is_some() {
            self.caret -= 1;
        }
    }

    pub fn save(&mut self) -> Result<()> {
        let state = self.block.save(self.block.render())?;
        write_record(&self.path, &state)?;
        self.status = format!("Saved {}", self.path.display());
        self.saved = state;
        Ok(())
    }
}

pub fn write_record(path: &Path, state: &BlockState) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, state.to_json())
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Write a default config file unless one is already there
pub fn init_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    Config::default().save_to_path(path)?;
    log::info!("wrote default config to {}", path.display());
    Ok(true)
}
