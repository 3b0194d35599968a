// Rust-upgrade (https://github.com/rust-lang/rust/issues/46379):
//   remove `#[allow(dead_code)]` before public functions.

use std::cell::RefCell;
use std::rc::Rc;

use quiz_display::repeater::{ItemForm, RepeatedItem};
use quiz_display::role::DisplayRole;
use quiz_display::session::ClientSession;
use serde_json::{Map, Value};


#[allow(dead_code)]
pub fn puppet_session(index: i32) -> ClientSession {
    ClientSession {
        access: "acc".to_owned(),
        page: 2,
        param: 5,
        index,
        monitor: 1,
        ..ClientSession::new(DisplayRole::from_flag("P"), "tok".to_owned())
    }
}

#[allow(dead_code)]
pub fn controller_session(index: i32) -> ClientSession {
    ClientSession {
        touch_nav: true,
        index,
        ..ClientSession::new(DisplayRole::Controller, "tok".to_owned())
    }
}

// Stand-in for a sub-form on a page. Clones share state, like DOM handles do.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct FakeForm {
    pub state: Rc<RefCell<FakeFormState>>,
}

#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct FakeFormState {
    pub index: Option<i64>,
    pub error: String,
    pub fields: Map<String, Value>,
}

impl FakeForm {
    #[allow(dead_code)]
    pub fn with_name(name: &str) -> Self {
        let form = FakeForm::default();
        form.set_field("Name", name);
        form
    }

    #[allow(dead_code)]
    pub fn set_field(&self, key: &str, value: &str) {
        self.state.borrow_mut().fields.insert(key.to_owned(), Value::from(value));
    }

    #[allow(dead_code)]
    pub fn stamped_index(&self) -> Option<i64> { self.state.borrow().index }
}

impl ItemForm for FakeForm {
    type Error = String;

    fn stamp(&self, index: i64, error: &str) -> Result<(), String> {
        let mut state = self.state.borrow_mut();
        state.index = Some(index);
        state.error = error.to_owned();
        Ok(())
    }

    fn populate(&self, item: &RepeatedItem) -> Result<(), String> {
        self.state.borrow_mut().fields = item.fields.clone();
        Ok(())
    }

    fn extract(&self) -> Result<RepeatedItem, String> {
        Ok(RepeatedItem {
            index: 0,
            error: String::new(),
            fields: self.state.borrow().fields.clone(),
        })
    }
}

// Sub-form that reports its fields as JSON without an index, the way page scripts do.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct PageForm {
    pub fields_json: Rc<RefCell<String>>,
}

impl PageForm {
    #[allow(dead_code)]
    pub fn with_fields(fields_json: &str) -> Self {
        PageForm { fields_json: Rc::new(RefCell::new(fields_json.to_owned())) }
    }
}

impl ItemForm for PageForm {
    type Error = String;

    fn stamp(&self, _index: i64, _error: &str) -> Result<(), String> { Ok(()) }

    fn populate(&self, item: &RepeatedItem) -> Result<(), String> {
        *self.fields_json.borrow_mut() = Value::Object(item.fields.clone()).to_string();
        Ok(())
    }

    fn extract(&self) -> Result<RepeatedItem, String> {
        serde_json::from_str(&self.fields_json.borrow()).map_err(|err| err.to_string())
    }
}
