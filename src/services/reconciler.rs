use crate::events::{LanguageId, Observation, WindowIdentity};

use super::preference_store::{PreferenceStore, WindowPreference};

/// Состояние по последнему опросу
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineState {
    pub current_window: Option<WindowIdentity>,
    pub current_language: Option<LanguageId>,
}

/// Решение по одному наблюдению
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Фокус вернулся в известное окно с другим языком: восстановить запомненный
    Restore { stored: LanguageId },
    /// Фокус вернулся в известное окно, язык уже совпадает
    Returned,
    /// Окно видим впервые: текущий язык становится базовым
    Baseline,
    /// Пользователь сменил язык, не покидая окна
    LanguageChanged { previous: Option<LanguageId> },
    Unchanged,
}

impl Reconciliation {
    pub fn is_window_change(&self) -> bool {
        matches!(
            self,
            Reconciliation::Restore { .. } | Reconciliation::Returned | Reconciliation::Baseline
        )
    }
}

/// Машина состояний согласования: таблица предпочтений + состояние движка.
///
/// `decide` ничего не меняет, `commit` применяет решение. Между ними вызывающий
/// отправляет команду восстановления; если она не удалась, `commit` не вызывается.
#[derive(Debug, Default)]
pub struct Reconciler {
    store: PreferenceStore,
    state: EngineState,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &PreferenceStore {
        &self.store
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn decide(&self, observation: &Observation) -> Reconciliation {
        let observed_language = observation.language();

        // Смена окна важнее сравнения языков
        if self.state.current_window.as_ref() != Some(observation.identity()) {
            return match self.store.get(observation.identity()) {
                Some(pref) if pref.language != observed_language => Reconciliation::Restore {
                    stored: pref.language,
                },
                Some(_) => Reconciliation::Returned,
                None => Reconciliation::Baseline,
            };
        }

        if self.state.current_language != Some(observed_language) {
            return Reconciliation::LanguageChanged {
                previous: self.state.current_language,
            };
        }

        Reconciliation::Unchanged
    }

    pub fn commit(&mut self, observation: &Observation, decision: &Reconciliation) {
        let observed_language = observation.language();

        match decision {
            Reconciliation::Unchanged => return,
            Reconciliation::Baseline | Reconciliation::LanguageChanged { .. } => {
                self.store.set(WindowPreference::new(
                    observation.identity().clone(),
                    observed_language,
                ));
            }
            Reconciliation::Restore { .. } | Reconciliation::Returned => {}
        }

        // Запоминаем наблюдённый язык, а не запрошенный: эффект восстановления
        // подтвердится только на следующем опросе
        self.state.current_window = Some(observation.identity().clone());
        self.state.current_language = Some(observed_language);
    }

    pub fn reconcile(&mut self, observation: &Observation) -> Reconciliation {
        let decision = self.decide(observation);
        self.commit(observation, &decision);
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{FocusedWindow, KeyboardLayout, NativeWindow, OwnerThread};

    const EN: LanguageId = LanguageId::ENGLISH_US;
    const HE: LanguageId = LanguageId::HEBREW;

    fn observe(title: &str, handle: i64, language: LanguageId) -> Observation {
        Observation::new(
            FocusedWindow::new(
                WindowIdentity::new(title, NativeWindow(handle)),
                NativeWindow(handle),
                OwnerThread(handle as u32),
            ),
            KeyboardLayout::for_language(language),
        )
    }

    fn stored(reconciler: &Reconciler, title: &str, handle: i64) -> Option<LanguageId> {
        reconciler
            .store()
            .get(&WindowIdentity::new(title, NativeWindow(handle)))
            .map(|p| p.language)
    }

    #[test]
    fn first_sight_records_baseline_without_restore() {
        let mut reconciler = Reconciler::new();

        assert_eq!(reconciler.reconcile(&observe("A", 1, HE)), Reconciliation::Baseline);
        assert_eq!(stored(&reconciler, "A", 1), Some(HE));
        assert_eq!(reconciler.state().current_language, Some(HE));
    }

    #[test]
    fn restore_on_return_keeps_observed_language_in_state() {
        let mut reconciler = Reconciler::new();
        reconciler.reconcile(&observe("A", 1, EN));
        reconciler.reconcile(&observe("B", 2, HE));

        let decision = reconciler.reconcile(&observe("A", 1, HE));

        assert_eq!(decision, Reconciliation::Restore { stored: EN });
        assert_eq!(
            reconciler.state().current_window,
            Some(WindowIdentity::new("A", NativeWindow(1)))
        );
        assert_eq!(reconciler.state().current_language, Some(HE));
        // Запомненный язык не перезаписывается наблюдённым
        assert_eq!(stored(&reconciler, "A", 1), Some(EN));
    }

    #[test]
    fn late_or_ignored_restore_is_seen_on_later_ticks() {
        let mut reconciler = Reconciler::new();
        reconciler.reconcile(&observe("A", 1, EN));
        reconciler.reconcile(&observe("B", 2, HE));
        reconciler.reconcile(&observe("A", 1, HE));

        // Оконная система применила запрос только теперь
        assert_eq!(
            reconciler.reconcile(&observe("A", 1, EN)),
            Reconciliation::LanguageChanged { previous: Some(HE) }
        );
        assert_eq!(stored(&reconciler, "A", 1), Some(EN));

        // Запрос проигнорирован: повторного восстановления нет, пока фокус не уйдёт из окна
        let mut ignored = Reconciler::new();
        ignored.reconcile(&observe("A", 1, EN));
        ignored.reconcile(&observe("B", 2, HE));
        ignored.reconcile(&observe("A", 1, HE));
        assert_eq!(ignored.reconcile(&observe("A", 1, HE)), Reconciliation::Unchanged);
        assert_eq!(stored(&ignored, "A", 1), Some(EN));
    }

    #[test]
    fn return_with_matching_language_needs_no_restore() {
        let mut reconciler = Reconciler::new();
        reconciler.reconcile(&observe("A", 1, EN));
        reconciler.reconcile(&observe("B", 2, HE));

        assert_eq!(reconciler.reconcile(&observe("A", 1, EN)), Reconciliation::Returned);
        assert_eq!(reconciler.state().current_language, Some(EN));
    }

    #[test]
    fn same_window_language_change_updates_preference() {
        let mut reconciler = Reconciler::new();
        reconciler.reconcile(&observe("A", 1, EN));

        let decision = reconciler.reconcile(&observe("A", 1, HE));

        assert_eq!(decision, Reconciliation::LanguageChanged { previous: Some(EN) });
        assert_eq!(stored(&reconciler, "A", 1), Some(HE));
        assert_eq!(reconciler.state().current_language, Some(HE));
    }

    #[test]
    fn no_change_leaves_store_and_state_untouched() {
        let mut reconciler = Reconciler::new();
        reconciler.reconcile(&observe("A", 1, EN));
        let state_before = reconciler.state().clone();
        let store_before: Vec<WindowPreference> = reconciler.store().iter().cloned().collect();

        assert_eq!(reconciler.reconcile(&observe("A", 1, EN)), Reconciliation::Unchanged);
        assert_eq!(reconciler.state(), &state_before);
        assert_eq!(
            reconciler.store().iter().cloned().collect::<Vec<_>>(),
            store_before
        );
    }

    #[test]
    fn window_change_wins_over_language_change() {
        let mut reconciler = Reconciler::new();
        reconciler.reconcile(&observe("A", 1, EN));

        // Новое окно и другой язык одновременно: это базовая запись для B,
        // а не обновление предпочтения A
        assert_eq!(reconciler.reconcile(&observe("B", 2, HE)), Reconciliation::Baseline);
        assert_eq!(stored(&reconciler, "A", 1), Some(EN));
        assert_eq!(stored(&reconciler, "B", 2), Some(HE));
    }

    #[test]
    fn same_title_different_handle_is_a_new_window() {
        let mut reconciler = Reconciler::new();
        reconciler.reconcile(&observe("Terminal", 1, EN));

        assert_eq!(
            reconciler.reconcile(&observe("Terminal", 2, HE)),
            Reconciliation::Baseline
        );
        assert_eq!(reconciler.store().len(), 2);
    }

    #[test]
    fn decide_does_not_mutate() {
        let mut reconciler = Reconciler::new();
        let observation = observe("A", 1, EN);

        assert_eq!(reconciler.decide(&observation), Reconciliation::Baseline);
        assert!(reconciler.store().is_empty());
        assert_eq!(reconciler.state(), &EngineState::default());

        reconciler.commit(&observation, &Reconciliation::Baseline);
        assert_eq!(reconciler.decide(&observation), Reconciliation::Unchanged);
    }

    #[test]
    fn example_poll_sequence() {
        let mut reconciler = Reconciler::new();
        let decisions = vec![
            reconciler.reconcile(&observe("A", 1, EN)),
            reconciler.reconcile(&observe("B", 2, HE)),
            reconciler.reconcile(&observe("A", 1, EN)),
        ];

        assert_eq!(
            decisions,
            vec![
                Reconciliation::Baseline,
                Reconciliation::Baseline,
                Reconciliation::Returned
            ]
        );
        assert_eq!(stored(&reconciler, "A", 1), Some(EN));
        assert_eq!(stored(&reconciler, "B", 2), Some(HE));

        // Через B и обратно в A, но язык остался от B
        reconciler.reconcile(&observe("B", 2, HE));
        let restores: Vec<Reconciliation> = vec![reconciler.reconcile(&observe("A", 1, HE))]
            .into_iter()
            .filter(|d| matches!(d, Reconciliation::Restore { .. }))
            .collect();
        assert_eq!(restores, vec![Reconciliation::Restore { stored: EN }]);
    }
}
