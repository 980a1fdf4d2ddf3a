//! The patient service: every CRUD operation as load → mutate → save.
//!
//! Each call validates its payload first, then reads the whole collection
//! from the `RecordStore`, applies the operation in memory and, for writes,
//! saves the whole collection back. Writes hold an in-process lock across
//! the full load-mutate-save sequence so two requests handled by the same
//! process cannot overwrite each other. Processes sharing one store file
//! still race.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::{debug, info, warn};

use carebook_contracts::{
    error::{CarebookError, CarebookResult},
    patient::{Patient, PatientId, PatientUpdate, PatientView, SortKey, SortOrder},
};

use crate::derive;
use crate::traits::{PayloadValidator, RecordStore};

pub struct PatientService {
    store: Box<dyn RecordStore>,
    validator: Arc<dyn PayloadValidator>,
    write_lock: Mutex<()>,
}

impl PatientService {
    pub fn new(store: Box<dyn RecordStore>, validator: Arc<dyn PayloadValidator>) -> Self {
        Self {
            store,
            validator,
            write_lock: Mutex::new(()),
        }
    }

    /// Every record keyed by id, with derived fields attached.
    pub fn list(&self) -> CarebookResult<BTreeMap<PatientId, PatientView>> {
        let patients = self.store.load()?;
        debug!(count = patients.len(), "listing patients");

        Ok(patients
            .iter()
            .map(|(id, patient)| (id.clone(), derive::view(None, patient)))
            .collect())
    }

    pub fn get(&self, id: &str) -> CarebookResult<PatientView> {
        let patients = self.store.load()?;
        let key = PatientId::new(id);

        patients
            .get(&key)
            .map(|patient| derive::view(None, patient))
            .ok_or_else(|| CarebookError::NotFound { id: id.to_string() })
    }

    /// All records ordered by `key`.
    ///
    /// The sort is stable: records with equal keys keep ascending-id order in
    /// both directions. A non-finite key (possible only for hand-edited store
    /// files) sorts as 0.
    pub fn sorted(&self, key: SortKey, order: SortOrder) -> CarebookResult<Vec<PatientView>> {
        let patients = self.store.load()?;
        debug!(?key, ?order, count = patients.len(), "sorting patients");

        let mut views: Vec<PatientView> = patients
            .iter()
            .map(|(id, patient)| derive::view(Some(id), patient))
            .collect();

        match order {
            SortOrder::Asc => {
                views.sort_by(|a, b| sort_value(a, key).total_cmp(&sort_value(b, key)))
            }
            SortOrder::Des => {
                views.sort_by(|a, b| sort_value(b, key).total_cmp(&sort_value(a, key)))
            }
        }

        Ok(views)
    }

    /// Validate and insert a new record. Returns the new id.
    pub fn create(&self, payload: &Value) -> CarebookResult<PatientId> {
        let new = self.validator.new_patient(payload)?;

        let _guard = self.lock_writes()?;
        let mut patients = self.store.load()?;

        if patients.contains_key(&new.id) {
            warn!(id = %new.id, "create rejected: id already exists");
            return Err(CarebookError::Conflict { id: new.id.0 });
        }

        patients.insert(new.id.clone(), new.patient);
        self.store.save(&patients)?;

        info!(id = %new.id, total = patients.len(), "patient created");
        Ok(new.id)
    }

    /// Merge the supplied fields into an existing record.
    ///
    /// The merged record is validated again as a whole; if that fails the
    /// store is left untouched. Returns the record as stored.
    pub fn update(&self, id: &str, payload: &Value) -> CarebookResult<PatientView> {
        let update = self.validator.patient_update(payload)?;
        if update.is_empty() {
            debug!(id, "update carries no fields; record will be rewritten unchanged");
        }

        let _guard = self.lock_writes()?;
        let mut patients = self.store.load()?;
        let key = PatientId::new(id);

        let existing = patients
            .get(&key)
            .ok_or_else(|| CarebookError::NotFound { id: id.to_string() })?;

        let merged = merge(existing, update);
        self.validator.patient(&key, &merged)?;

        let view = derive::view(None, &merged);
        patients.insert(key.clone(), merged);
        self.store.save(&patients)?;

        info!(id = %key, "patient updated");
        Ok(view)
    }

    pub fn delete(&self, id: &str) -> CarebookResult<()> {
        let _guard = self.lock_writes()?;
        let mut patients = self.store.load()?;
        let key = PatientId::new(id);

        if patients.remove(&key).is_none() {
            warn!(id = %key, "delete rejected: no such patient");
            return Err(CarebookError::NotFound { id: id.to_string() });
        }

        self.store.save(&patients)?;

        info!(id = %key, remaining = patients.len(), "patient deleted");
        Ok(())
    }

    fn lock_writes(&self) -> CarebookResult<std::sync::MutexGuard<'_, ()>> {
        self.write_lock.lock().map_err(|e| CarebookError::StateError {
            reason: format!("store write lock poisoned: {e}"),
        })
    }
}

/// Overlay the fields present in `update` onto a copy of `existing`.
pub fn merge(existing: &Patient, update: PatientUpdate) -> Patient {
    Patient {
        name: update.name.unwrap_or_else(|| existing.name.clone()),
        city: update.city.unwrap_or_else(|| existing.city.clone()),
        gender: update.gender.unwrap_or(existing.gender),
        age: update.age.unwrap_or(existing.age),
        height: update.height.unwrap_or(existing.height),
        weight: update.weight.unwrap_or(existing.weight),
    }
}

fn sort_value(view: &PatientView, key: SortKey) -> f64 {
    let value = match key {
        SortKey::Age => f64::from(view.patient.age),
        SortKey::Height => view.patient.height,
        SortKey::Weight => view.patient.weight,
        SortKey::Bmi => view.bmi,
    };
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use carebook_contracts::{
        error::{CarebookError, CarebookResult},
        patient::{Gender, NewPatient, Patient, PatientId, PatientMap, PatientUpdate, SortKey, SortOrder},
        premium::PredictionInput,
        validate::FieldViolation,
    };

    use crate::traits::{PayloadValidator, RecordStore};

    use super::PatientService;

    // ── Mock helpers ─────────────────────────────────────────────────────────

    /// A store that keeps the map in memory and counts saves.
    #[derive(Clone, Default)]
    struct MockStore {
        patients: Arc<Mutex<PatientMap>>,
        saves: Arc<Mutex<u32>>,
    }

    impl RecordStore for MockStore {
        fn load(&self) -> CarebookResult<PatientMap> {
            let snapshot = self.patients.lock().unwrap().clone();
            std::thread::yield_now();
            Ok(snapshot)
        }

        fn save(&self, patients: &PatientMap) -> CarebookResult<()> {
            *self.patients.lock().unwrap() = patients.clone();
            *self.saves.lock().unwrap() += 1;
            Ok(())
        }
    }

    /// Deserializes payloads and enforces the age bound only.
    struct MockValidator;

    impl MockValidator {
        fn check_age(age: u32) -> CarebookResult<()> {
            if age == 0 || age >= 120 {
                return Err(CarebookError::invalid("age", "must be between 1 and 119"));
            }
            Ok(())
        }
    }

    impl PayloadValidator for MockValidator {
        fn new_patient(&self, payload: &serde_json::Value) -> CarebookResult<NewPatient> {
            let new: NewPatient = serde_json::from_value(payload.clone())
                .map_err(|e| CarebookError::invalid("", e.to_string()))?;
            Self::check_age(new.patient.age)?;
            Ok(new)
        }

        fn patient_update(&self, payload: &serde_json::Value) -> CarebookResult<PatientUpdate> {
            serde_json::from_value(payload.clone())
                .map_err(|e| CarebookError::invalid("", e.to_string()))
        }

        fn patient(&self, _id: &PatientId, patient: &Patient) -> CarebookResult<()> {
            Self::check_age(patient.age)
        }

        fn prediction_input(&self, _payload: &serde_json::Value) -> CarebookResult<PredictionInput> {
            Err(CarebookError::Validation {
                failures: vec![FieldViolation::new("", "not used by these tests")],
            })
        }
    }

    fn patient(name: &str, age: u32, height: f64, weight: f64) -> Patient {
        Patient {
            name: name.to_string(),
            city: "Pune".to_string(),
            gender: Gender::Female,
            age,
            height,
            weight,
        }
    }

    /// A service over three records with ages 20/45/70 and distinct BMIs.
    fn seeded() -> (PatientService, MockStore) {
        let store = MockStore::default();
        {
            let mut map = store.patients.lock().unwrap();
            map.insert(PatientId::new("P001"), patient("Asha", 45, 1.60, 70.0));
            map.insert(PatientId::new("P002"), patient("Binod", 20, 1.80, 60.0));
            map.insert(PatientId::new("P003"), patient("Chitra", 70, 1.55, 50.0));
        }
        let service = PatientService::new(Box::new(store.clone()), Arc::new(MockValidator));
        (service, store)
    }

    fn save_count(store: &MockStore) -> u32 {
        *store.saves.lock().unwrap()
    }

    // ── Reads ────────────────────────────────────────────────────────────────

    #[test]
    fn test_list_returns_every_record_with_derived_fields() {
        let (service, _) = seeded();
        let all = service.list().unwrap();
        assert_eq!(all.len(), 3);
        let asha = &all[&PatientId::new("P001")];
        assert_eq!(asha.bmi, 27.34);
        assert!(asha.id.is_none());
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let (service, _) = seeded();
        match service.get("P999") {
            Err(CarebookError::NotFound { id }) => assert_eq!(id, "P999"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_sort_by_age_descending() {
        let (service, _) = seeded();
        let ages: Vec<u32> = service
            .sorted(SortKey::Age, SortOrder::Des)
            .unwrap()
            .iter()
            .map(|v| v.patient.age)
            .collect();
        assert_eq!(ages, vec![70, 45, 20]);
    }

    #[test]
    fn test_sort_by_bmi_directions_are_reverses() {
        let (service, _) = seeded();
        let asc: Vec<PatientId> = service
            .sorted(SortKey::Bmi, SortOrder::Asc)
            .unwrap()
            .into_iter()
            .filter_map(|v| v.id)
            .collect();
        let mut des: Vec<PatientId> = service
            .sorted(SortKey::Bmi, SortOrder::Des)
            .unwrap()
            .into_iter()
            .filter_map(|v| v.id)
            .collect();
        assert_eq!(asc.len(), 3);
        des.reverse();
        assert_eq!(asc, des);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let store = MockStore::default();
        {
            let mut map = store.patients.lock().unwrap();
            map.insert(PatientId::new("A"), patient("a", 30, 1.7, 60.0));
            map.insert(PatientId::new("B"), patient("b", 30, 1.7, 61.0));
            map.insert(PatientId::new("C"), patient("c", 25, 1.7, 62.0));
        }
        let service = PatientService::new(Box::new(store), Arc::new(MockValidator));

        let ids: Vec<String> = service
            .sorted(SortKey::Age, SortOrder::Des)
            .unwrap()
            .into_iter()
            .filter_map(|v| v.id.map(|id| id.0))
            .collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
    }

    // ── Create ───────────────────────────────────────────────────────────────

    #[test]
    fn test_create_inserts_and_persists() {
        let (service, store) = seeded();
        let id = service
            .create(&json!({
                "id": "P004", "name": "Dev", "city": "Agra", "gender": "male",
                "age": 33, "height": 1.7, "weight": 68.0
            }))
            .unwrap();

        assert_eq!(id.as_str(), "P004");
        assert_eq!(save_count(&store), 1);
        assert_eq!(service.get("P004").unwrap().patient.name, "Dev");
    }

    #[test]
    fn test_create_duplicate_conflicts_without_saving() {
        let (service, store) = seeded();
        let before = store.load().unwrap();

        let result = service.create(&json!({
            "id": "P001", "name": "Imposter", "city": "Agra", "gender": "male",
            "age": 33, "height": 1.7, "weight": 68.0
        }));

        match result {
            Err(CarebookError::Conflict { id }) => assert_eq!(id, "P001"),
            other => panic!("expected Conflict, got {:?}", other),
        }
        assert_eq!(save_count(&store), 0);
        assert_eq!(store.load().unwrap(), before);
    }

    #[test]
    fn test_create_invalid_payload_never_touches_store() {
        let (service, store) = seeded();
        let result = service.create(&json!({
            "id": "P005", "name": "Old", "city": "Agra", "gender": "male",
            "age": 150, "height": 1.7, "weight": 68.0
        }));
        assert!(matches!(result, Err(CarebookError::Validation { .. })));
        assert_eq!(save_count(&store), 0);
    }

    // ── Update ───────────────────────────────────────────────────────────────

    #[test]
    fn test_update_merges_supplied_fields_only() {
        let (service, store) = seeded();
        let view = service
            .update("P002", &json!({ "city": "Noida", "weight": 72.0 }))
            .unwrap();

        assert_eq!(view.patient.city, "Noida");
        assert_eq!(view.patient.weight, 72.0);
        assert_eq!(view.bmi, 22.22);

        let stored = service.get("P002").unwrap().patient;
        assert_eq!(stored.city, "Noida");
        assert_eq!(stored.name, "Binod");
        assert_eq!(stored.age, 20);
        assert_eq!(stored.height, 1.80);
        assert_eq!(save_count(&store), 1);
    }

    #[test]
    fn test_empty_update_keeps_record() {
        let (service, store) = seeded();
        let before = store.load().unwrap();

        let view = service.update("P001", &json!({})).unwrap();

        assert_eq!(view.patient.name, "Asha");
        assert_eq!(store.load().unwrap(), before);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let (service, store) = seeded();
        let result = service.update("P404", &json!({ "city": "Noida" }));
        assert!(matches!(result, Err(CarebookError::NotFound { .. })));
        assert_eq!(save_count(&store), 0);
    }

    #[test]
    fn test_update_rejected_after_merge_leaves_store_unchanged() {
        let (service, store) = seeded();
        let before = store.load().unwrap();

        let result = service.update("P003", &json!({ "age": 0 }));

        assert!(matches!(result, Err(CarebookError::Validation { .. })));
        assert_eq!(save_count(&store), 0);
        assert_eq!(store.load().unwrap(), before);
    }

    // ── Delete ───────────────────────────────────────────────────────────────

    #[test]
    fn test_delete_removes_only_target() {
        let (service, store) = seeded();
        service.delete("P002").unwrap();

        let remaining = store.load().unwrap();
        assert_eq!(remaining.len(), 2);
        assert!(!remaining.contains_key(&PatientId::new("P002")));
        assert_eq!(remaining[&PatientId::new("P001")].name, "Asha");
        assert_eq!(remaining[&PatientId::new("P003")].name, "Chitra");
    }

    #[test]
    fn test_delete_missing_leaves_store_unchanged() {
        let (service, store) = seeded();
        let before = store.load().unwrap();

        assert!(matches!(
            service.delete("P404"),
            Err(CarebookError::NotFound { .. })
        ));
        assert_eq!(save_count(&store), 0);
        assert_eq!(store.load().unwrap(), before);
    }

    // ── Concurrency ──────────────────────────────────────────────────────────

    /// Writers racing on one service each see the others' records.
    #[test]
    fn test_concurrent_creates_lose_no_records() {
        const WRITERS: usize = 32;
        let store = MockStore::default();
        let service = Arc::new(PatientService::new(
            Box::new(store.clone()),
            Arc::new(MockValidator),
        ));

        let handles: Vec<_> = (0..WRITERS)
            .map(|n| {
                let service = Arc::clone(&service);
                std::thread::spawn(move || {
                    service
                        .create(&json!({
                            "id": format!("C{n:03}"),
                            "name": "Concurrent",
                            "city": "Pune",
                            "gender": "other",
                            "age": 30,
                            "height": 1.7,
                            "weight": 65.0
                        }))
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stored = store.load().unwrap();
        assert_eq!(stored.len(), WRITERS);
        assert_eq!(save_count(&store), WRITERS as u32);
    }
}
