use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug, Default)]
pub struct TaskSeq {
    next: u64,
}

impl TaskSeq {
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    SilentRefresh,
    Login,
    Register,
    PasswordReset,
}

#[derive(Debug, Clone)]
pub struct TaskStarted {
    pub id: TaskId,
    pub cancel: Option<CancellationToken>,
}

#[derive(Debug)]
pub struct TaskCompleted<E> {
    pub id: TaskId,
    pub result: E,
}

/// Task lifecycle state (stored in AppState, mutated only by reducer).
#[derive(Debug, Default, Clone)]
pub struct TaskState {
    pub active: Option<TaskId>,
    pub cancel: Option<CancellationToken>,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn on_started(&mut self, started: &TaskStarted) {
        self.active = Some(started.id);
        self.cancel = started.cancel.clone();
    }

    /// Clears the task if `id` is the active one. A false return means the
    /// result belongs to a superseded or cancelled task and must be dropped.
    pub fn finish_if_active(&mut self, id: TaskId) -> bool {
        let ok = self.active == Some(id);
        if ok {
            self.active = None;
            self.cancel = None;
        }
        ok
    }

    /// Forgets the active task and hands back its cancel token.
    pub fn take_cancel(&mut self) -> Option<CancellationToken> {
        self.active = None;
        self.cancel.take()
    }
}

#[derive(Debug, Default, Clone)]
pub struct Tasks {
    pub silent_refresh: TaskState,
    pub login: TaskState,
    pub register: TaskState,
    pub password_reset: TaskState,
}

impl Tasks {
    pub fn state(&self, kind: TaskKind) -> &TaskState {
        match kind {
            TaskKind::SilentRefresh => &self.silent_refresh,
            TaskKind::Login => &self.login,
            TaskKind::Register => &self.register,
            TaskKind::PasswordReset => &self.password_reset,
        }
    }

    pub fn state_mut(&mut self, kind: TaskKind) -> &mut TaskState {
        match kind {
            TaskKind::SilentRefresh => &mut self.silent_refresh,
            TaskKind::Login => &mut self.login,
            TaskKind::Register => &mut self.register,
            TaskKind::PasswordReset => &mut self.password_reset,
        }
    }

    pub fn is_any_running(&self) -> bool {
        self.silent_refresh.is_running()
            || self.login.is_running()
            || self.register.is_running()
            || self.password_reset.is_running()
    }

    /// Login or registration in flight; the auth form is locked meanwhile.
    pub fn is_authenticating(&self) -> bool {
        self.login.is_running() || self.register.is_running()
    }
}
