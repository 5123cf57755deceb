use crate::algorithm::StopReason;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Message {
    CreatingNail(usize),
    Preprocessing,
    Computing(usize),
    Stalled(usize),
    Stopped(StopReason),
}

pub trait Verboser {
    fn verbose(&mut self, message: Message);
}

pub struct Silent;

impl Verboser for Silent {
    fn verbose(&mut self, _: Message) {}
}

impl<F: FnMut(Message)> Verboser for F {
    fn verbose(&mut self, message: Message) {
        (*self)(message)
    }
}
