pub trait VecExtensions<T> {
    fn remove_first_where<F>(&mut self, predicate: F) -> Option<T>
    where
        F: Fn(&T) -> bool;
}

impl<T> VecExtensions<T> for Vec<T> {
    fn remove_first_where<F>(&mut self, predicate: F) -> Option<T>
    where
        F: Fn(&T) -> bool,
    {
        self.iter()
            .position(predicate)
            .map(|index| self.remove(index))
    }
}

pub trait SliceExtensions<T> {
    /// True if every item of `items` can be matched to a distinct element of `self`.
    fn contains_all(&self, items: &[T]) -> bool;

    /// Elements of `self` left over after removing one match per item of `items`.
    fn without(&self, items: &[T]) -> Vec<T>;
}

impl<T: PartialEq + Clone> SliceExtensions<T> for [T] {
    fn contains_all(&self, items: &[T]) -> bool {
        let mut rest = self.to_vec();
        items
            .iter()
            .all(|item| rest.remove_first_where(|x| x == item).is_some())
    }

    fn without(&self, items: &[T]) -> Vec<T> {
        let mut rest = self.to_vec();
        for item in items {
            rest.remove_first_where(|x| x == item);
        }
        rest
    }
}

#[cfg(test)]
mod tests {
    use crate::utils::{SliceExtensions, VecExtensions};

    #[test]
    fn remove_first_where_should_remove_only_the_first_match() {
        let mut v = vec![1, 2, 3, 2];
        assert_eq!(v.remove_first_where(|&x| x == 2), Some(2));
        assert_eq!(v, vec![1, 3, 2]);
        assert_eq!(v.remove_first_where(|&x| x == 7), None);
    }

    #[test]
    fn contains_all_should_respect_multiplicity() {
        let hand = [1, 1, 2];
        assert!(hand.contains_all(&[1, 1]));
        assert!(hand.contains_all(&[]));
        assert!(!hand.contains_all(&[2, 2]));
    }

    #[test]
    fn without_should_remove_one_element_per_item() {
        assert_eq!([1, 1, 2].without(&[1, 3]), vec![1, 2]);
    }
}
