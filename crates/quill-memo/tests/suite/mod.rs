mod memoizer;
