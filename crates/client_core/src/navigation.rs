//! Screen routing collaborator. The registration flow only needs a one-time
//! forward transition; the router keeps a back stack for the CLI driver.

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Registration,
    Auth,
    Main,
    Product,
}

impl Screen {
    pub const START: Screen = Screen::Registration;

    pub fn route(self) -> &'static str {
        match self {
            Screen::Registration => "registration",
            Screen::Auth => "auth",
            Screen::Main => "main",
            Screen::Product => "product",
        }
    }
}

pub trait Navigator {
    fn navigate(&mut self, screen: Screen);
}

#[derive(Debug, Clone)]
pub struct ScreenRouter {
    current: Screen,
    back_stack: Vec<Screen>,
}

impl Default for ScreenRouter {
    fn default() -> Self {
        Self::new(Screen::START)
    }
}

impl ScreenRouter {
    pub fn new(start: Screen) -> Self {
        Self {
            current: start,
            back_stack: Vec::new(),
        }
    }

    pub fn current(&self) -> Screen {
        self.current
    }

    pub fn depth(&self) -> usize {
        self.back_stack.len()
    }

    /// Returns to the previous screen; `false` when already at the root.
    pub fn back(&mut self) -> bool {
        match self.back_stack.pop() {
            Some(previous) => {
                debug!(from = self.current.route(), to = previous.route(), "navigate back");
                self.current = previous;
                true
            }
            None => false,
        }
    }
}

impl Navigator for ScreenRouter {
    fn navigate(&mut self, screen: Screen) {
        debug!(from = self.current.route(), to = screen.route(), "navigate");
        self.back_stack.push(self.current);
        self.current = screen;
    }
}
