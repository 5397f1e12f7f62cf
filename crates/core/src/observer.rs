/// Receives events from a running computation and may steer it.
///
/// Implemented for any `FnMut(&E) -> Option<A>` closure and for `()`, which
/// observes nothing.
pub trait Observer<E, A> {
    /// Observes an event and optionally returns a control action.
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Action {
        Halt,
    }

    fn drive<O: Observer<u32, Action>>(mut observer: O, events: &[u32]) -> Option<usize> {
        events
            .iter()
            .position(|event| observer.observe(event) == Some(Action::Halt))
    }

    #[test]
    fn closures_can_halt() {
        let halted_at = drive(|temp: &u32| (*temp > 390).then_some(Action::Halt), &[300, 350, 395, 400]);
        assert_eq!(halted_at, Some(2));
    }

    #[test]
    fn unit_observer_never_acts() {
        assert_eq!(drive((), &[1, 2, 3]), None);
    }
}
